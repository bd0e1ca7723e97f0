use std::fmt;
use std::str::FromStr;

/// Languages offered by the interactive client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    ZhCn,
    Es,
    Fr,
    Ja,
    Ko,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::ZhCn,
        Language::Es,
        Language::Fr,
        Language::Ja,
        Language::Ko,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::ZhCn => "zh-CN",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }

    /// File name offered for downloaded audio, e.g. `tts_zh-CN.mp3`.
    pub fn download_name(self) -> String {
        format!("tts_{}.mp3", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let codes: Vec<_> = Language::ALL.iter().map(|l| l.code()).collect();
                format!("Unsupported language '{}' (choose one of: {})", s, codes.join(", "))
            })
    }
}
