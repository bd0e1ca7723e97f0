use lazy_static::lazy_static;
use regex::Regex;

/// Longest piece of text the speech endpoint accepts in one request.
pub const MAX_CHUNK_CHARS: usize = 100;

lazy_static! {
    static ref TONE_MARKS: Regex = Regex::new(r"([?!？！])").unwrap();
    static ref HYPHENATED_LINE_END: Regex = Regex::new(r"-\r?\n").unwrap();
    static ref ABBREVIATIONS: Regex =
        Regex::new(r"(?i)\b(dr|jr|mr|mrs|ms|msgr|prof|sr|st)\.").unwrap();
    static ref BREAK_REGEX: Regex = Regex::new(
        r"(?x)
        ([?!？！¡¿()\[\]…‥،;:—。，、：\n])|   # Always a break
        (\.)(?:\s|$)|                      # Period ending a sentence, not 3.14
        (,)(?:\D|$)                        # Comma, not 1,000
        "
    )
    .unwrap();
}

/// Normalise text before it is split: spacing after tone marks, hyphenated
/// line ends joined, and abbreviation periods dropped so they don't break.
pub fn preprocess(input: &str) -> String {
    let text = TONE_MARKS.replace_all(input, "$1 ");
    let text = HYPHENATED_LINE_END.replace_all(&text, "");
    ABBREVIATIONS.replace_all(&text, "$1").into_owned()
}

/// Split text into the pieces sent upstream, each at most `MAX_CHUNK_CHARS`
/// characters. Pieces made only of punctuation or whitespace are dropped.
pub fn chunks(input: &str) -> Vec<String> {
    let text = preprocess(input);
    let mut pieces = Vec::new();
    let mut last_end = 0;

    for cap in BREAK_REGEX.captures_iter(&text) {
        let Some(cut) = (1..=3).find_map(|i| cap.get(i)).map(|m| m.end()) else {
            continue;
        };
        if cut > last_end {
            minimize(&text[last_end..cut], MAX_CHUNK_CHARS, &mut pieces);
            last_end = cut;
        }
    }

    if last_end < text.len() {
        minimize(&text[last_end..], MAX_CHUNK_CHARS, &mut pieces);
    }

    pieces
        .into_iter()
        .filter(|p| p.chars().any(char::is_alphanumeric))
        .collect()
}

/// Break an over-long piece on the last whitespace before the limit, or hard
/// at the limit when there is none.
fn minimize(piece: &str, max_chars: usize, out: &mut Vec<String>) {
    let mut rest = piece.trim();

    while rest.chars().count() > max_chars {
        let limit = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..limit]
            .rfind(char::is_whitespace)
            .filter(|&i| i > 0)
            .unwrap_or(limit);

        out.push(rest[..cut].trim_end().to_string());
        rest = rest[cut..].trim_start();
    }

    if !rest.is_empty() {
        out.push(rest.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunks("Hello world"), vec!["Hello world"]);
    }

    #[test]
    fn splits_on_sentence_punctuation() {
        assert_eq!(
            chunks("Hello there. How are you? Fine, thanks"),
            vec!["Hello there.", "How are you?", "Fine,", "thanks"]
        );
    }

    #[test]
    fn keeps_numbers_together() {
        assert_eq!(chunks("Pi is 3.14 and 1,000"), vec!["Pi is 3.14 and 1,000"]);
    }

    #[test]
    fn drops_abbreviation_periods() {
        assert_eq!(chunks("Dr. Smith is here"), vec!["Dr Smith is here"]);
    }

    #[test]
    fn joins_hyphenated_line_ends() {
        assert_eq!(chunks("syn-\nthesis"), vec!["synthesis"]);
    }

    #[test]
    fn splits_cjk_punctuation() {
        assert_eq!(chunks("你好。世界"), vec!["你好。", "世界"]);
    }

    #[test]
    fn long_text_respects_limit() {
        let text = "word ".repeat(80);
        let pieces = chunks(&text);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(piece.chars().count() <= MAX_CHUNK_CHARS);
            assert!(!piece.starts_with(' ') && !piece.ends_with(' '));
        }
        assert_eq!(pieces.join(" ").split_whitespace().count(), 80);
    }

    #[test]
    fn long_word_is_hard_split() {
        let text = "a".repeat(250);
        let pieces = chunks(&text);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[2].len(), 50);
    }

    #[test]
    fn punctuation_only_yields_nothing() {
        assert!(chunks("... ?! ,").is_empty());
        assert!(chunks("   ").is_empty());
    }
}
