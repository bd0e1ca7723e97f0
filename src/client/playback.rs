/// Play MP3 bytes on the default output device without blocking the caller.
#[cfg(feature = "audio-playback")]
pub fn spawn_playback(audio: Vec<u8>) {
    tokio::task::spawn_blocking(move || {
        if let Err(e) = play_audio(audio) {
            tracing::error!("Failed to play audio: {}", e);
        }
    });
}

#[cfg(feature = "audio-playback")]
fn play_audio(audio: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    let (_stream, stream_handle) = rodio::OutputStream::try_default()?;
    let sink = rodio::Sink::try_new(&stream_handle)?;
    sink.append(rodio::Decoder::new(std::io::Cursor::new(audio))?);
    sink.sleep_until_end();
    Ok(())
}

#[cfg(not(feature = "audio-playback"))]
pub fn spawn_playback(_audio: Vec<u8>) {
    tracing::warn!("Built without audio playback support");
}

pub fn available() -> bool {
    cfg!(feature = "audio-playback")
}
