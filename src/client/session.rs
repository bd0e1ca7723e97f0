use std::io::{self, Write};
use std::path::PathBuf;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{playback, Language, TtsClient};
use crate::api::SynthesisRequest;
use crate::error::ClientError;

const HELP: &str = "\
Type text and press Enter on an empty line to synthesize it.
Commands:
  /lang <code>    switch language (en, zh-CN, es, fr, ja, ko)
  /slow on|off    toggle slow mode
  /play           play the last result again
  /help           show this help
  /quit           exit
Start a line with // to speak text that begins with a slash.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
    PlaybackReady,
    ErrorShown,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Lang(Language),
    Slow(bool),
    Play,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let mut parts = line.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "/lang" if arg.is_empty() => Err("Usage: /lang <code>".into()),
        "/lang" => arg.parse().map(SessionCommand::Lang),
        "/slow" => match arg {
            "on" | "true" | "1" => Ok(SessionCommand::Slow(true)),
            "off" | "false" | "0" => Ok(SessionCommand::Slow(false)),
            _ => Err("Usage: /slow on|off".into()),
        },
        "/play" => Ok(SessionCommand::Play),
        "/help" | "/?" => Ok(SessionCommand::Help),
        "/quit" | "/exit" => Ok(SessionCommand::Quit),
        _ => Err(format!("Unknown command '{}' (try /help)", name)),
    }
}

/// One interactive user at a time: compose, dispatch, show the outcome.
pub struct Session<W: Write> {
    client: TtsClient,
    lang: Language,
    slow: bool,
    output_dir: PathBuf,
    play: bool,
    state: SessionState,
    last_audio: Option<Vec<u8>>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(client: TtsClient, lang: Language, slow: bool, output_dir: PathBuf, out: W) -> Self {
        Self {
            client,
            lang,
            slow,
            output_dir,
            play: false,
            state: SessionState::Idle,
            last_audio: None,
            out,
        }
    }

    pub fn with_playback(mut self, play: bool) -> Self {
        self.play = play;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn lang(&self) -> Language {
        self.lang
    }

    pub fn slow(&self) -> bool {
        self.slow
    }

    pub fn last_audio(&self) -> Option<&[u8]> {
        self.last_audio.as_deref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Send `text` with the current settings and save the audio as
    /// `<output_dir>/tts_<lang>.mp3`.
    pub async fn submit(&mut self, text: &str) -> Result<PathBuf, ClientError> {
        if text.trim().is_empty() {
            self.state = SessionState::ErrorShown;
            return Err(ClientError::Validation("Please enter some text".into()));
        }

        self.state = SessionState::AwaitingResponse;

        let request = SynthesisRequest::new(text, self.lang.code(), self.slow);
        let result = self.client.synthesize(&request).await;
        let result = result.and_then(|audio| self.store(audio));

        self.state = match result {
            Ok(_) => SessionState::PlaybackReady,
            Err(_) => SessionState::ErrorShown,
        };
        result
    }

    fn store(&mut self, audio: Vec<u8>) -> Result<PathBuf, ClientError> {
        let path = self.output_dir.join(self.lang.download_name());
        std::fs::write(&path, &audio)?;
        self.last_audio = Some(audio);
        Ok(path)
    }

    /// Drive the loop until `/quit` or end of input. A draft still pending at
    /// end of input is submitted. Only failures writing to `out` or reading
    /// `input` end the loop early.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> io::Result<()> {
        writeln!(self.out, "{}", HELP)?;
        self.prompt(false)?;

        let mut lines = input.lines();
        let mut draft = String::new();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();

            if draft.is_empty() && trimmed.starts_with("//") {
                draft.push_str(&line.trim_start()[1..]);
            } else if draft.is_empty() && trimmed.starts_with('/') {
                match parse_command(trimmed) {
                    Ok(SessionCommand::Quit) => break,
                    Ok(command) => self.apply(command)?,
                    Err(message) => writeln!(self.out, "{}", message)?,
                }
            } else if trimmed.is_empty() {
                self.dispatch(&draft).await?;
                draft.clear();
            } else {
                if !draft.is_empty() {
                    draft.push('\n');
                }
                draft.push_str(&line);
            }

            self.prompt(!draft.is_empty())?;
        }

        if !draft.trim().is_empty() {
            self.dispatch(&draft).await?;
        }

        self.state = SessionState::Terminated;
        writeln!(self.out)?;
        Ok(())
    }

    async fn dispatch(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "Generating...")?;
        self.out.flush()?;

        match self.submit(text).await {
            Ok(path) => {
                let size = self.last_audio.as_ref().map_or(0, Vec::len);
                writeln!(self.out, "Saved {} ({} bytes)", path.display(), size)?;
                if self.play {
                    self.play_last();
                }
            }
            Err(e) => {
                tracing::debug!("Request failed: {:?}", e);
                writeln!(self.out, "Error: {}", e)?;
            }
        }
        Ok(())
    }

    fn apply(&mut self, command: SessionCommand) -> io::Result<()> {
        match command {
            SessionCommand::Lang(lang) => {
                self.lang = lang;
                writeln!(self.out, "Language: {}", lang)?;
            }
            SessionCommand::Slow(slow) => {
                self.slow = slow;
                writeln!(self.out, "Slow mode: {}", if slow { "on" } else { "off" })?;
            }
            SessionCommand::Play => {
                if !playback::available() {
                    writeln!(self.out, "Playback is not available in this build")?;
                } else if self.last_audio.is_none() {
                    writeln!(self.out, "Nothing to play yet")?;
                } else {
                    self.play_last();
                }
            }
            SessionCommand::Help => writeln!(self.out, "{}", HELP)?,
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn play_last(&self) {
        if let Some(audio) = &self.last_audio {
            playback::spawn_playback(audio.clone());
        }
    }

    fn prompt(&mut self, continuing: bool) -> io::Result<()> {
        if !continuing {
            self.state = SessionState::Idle;
        }
        let marker = if continuing { "..." } else { ">" };
        write!(
            self.out,
            "[{}{}] {} ",
            self.lang,
            if self.slow { ", slow" } else { "" },
            marker
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn parses_language_command() {
        assert_eq!(
            parse_command("/lang zh-CN"),
            Ok(SessionCommand::Lang(Language::ZhCn))
        );
        assert!(parse_command("/lang").is_err());
        assert!(parse_command("/lang de").is_err());
    }

    #[test]
    fn parses_slow_command() {
        assert_eq!(parse_command("/slow on"), Ok(SessionCommand::Slow(true)));
        assert_eq!(parse_command("/slow  off "), Ok(SessionCommand::Slow(false)));
        assert!(parse_command("/slow maybe").is_err());
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("/quit"), Ok(SessionCommand::Quit));
        assert_eq!(parse_command("/exit"), Ok(SessionCommand::Quit));
        assert_eq!(parse_command("/help"), Ok(SessionCommand::Help));
        assert_eq!(parse_command("/play"), Ok(SessionCommand::Play));
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = parse_command("/volume 11").unwrap_err();
        assert!(err.contains("/volume"));
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_a_request() {
        // Accepts connections but never answers: a request would never complete.
        let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", silent.local_addr().unwrap());
        let client = TtsClient::new(url, None).unwrap();
        let dir = std::env::temp_dir();
        let mut session = Session::new(client, Language::En, false, dir, Vec::new());

        let err = tokio::time::timeout(Duration::from_secs(1), session.submit("   \n "))
            .await
            .expect("empty text must not wait on the service")
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(session.state(), SessionState::ErrorShown);
        assert!(session.last_audio().is_none());
    }

    #[tokio::test]
    async fn commands_update_settings() {
        let client = TtsClient::new("http://127.0.0.1:9", None).unwrap();
        let mut session = Session::new(client, Language::En, false, std::env::temp_dir(), Vec::new());

        let input: &[u8] = b"/lang ja\n/slow on\n/bogus\n/quit\n";
        session.run(input).await.unwrap();

        assert_eq!(session.lang(), Language::Ja);
        assert!(session.slow());
        assert_eq!(session.state(), SessionState::Terminated);

        let output = String::from_utf8(session.into_output()).unwrap();
        assert!(output.contains("Language: ja"));
        assert!(output.contains("Slow mode: on"));
        assert!(output.contains("Unknown command '/bogus'"));
    }
}
