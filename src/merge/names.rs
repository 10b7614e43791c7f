use once_cell::sync::Lazy;
use regex::Regex;

/// Patronymic suffixes ("son of" / "daughter of") in Latin and Cyrillic
/// spellings, with every apostrophe variant seen in the wild.
static HONORIFIC_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:o['’‘`ʻʼ]?g['’‘`ʻʼ]?li|qizi|ўғли|угли|қизи|кизи)\b")
        .expect("honorific suffix pattern is valid")
});

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical matching key for a student name.
///
/// An empty result means "no name present".
pub fn normalize_name(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let stripped = HONORIFIC_SUFFIX.replace_all(&collapsed, "");
    collapse_whitespace(&stripped).to_lowercase()
}

/// "Surname Given Patronymic" -> "Surname G.P."
pub fn shorten_teacher_name(full: &str) -> String {
    let parts: Vec<&str> = full.split_whitespace().collect();
    if parts.len() < 2 {
        return full.trim().to_string();
    }

    let initial = |part: &str| {
        part.chars()
            .next()
            .map(|c| format!("{}.", c))
            .unwrap_or_default()
    };
    let patronymic = parts.get(2).map(|p| initial(p)).unwrap_or_default();

    format!("{} {}{}", parts[0], initial(parts[1]), patronymic).replace("..", ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_lowercases() {
        assert_eq!(normalize_name("  Aliyev   Vali  "), "aliyev vali");
        assert_eq!(normalize_name("ALIYEV\tVALI"), "aliyev vali");
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_normalize_strips_patronymic_suffixes() {
        assert_eq!(normalize_name("Aliyev Vali o'g'li"), "aliyev vali");
        assert_eq!(normalize_name("Aliyev Vali O‘G‘LI"), "aliyev vali");
        assert_eq!(normalize_name("Aliyev Vali ogli"), "aliyev vali");
        assert_eq!(normalize_name("Aliyev Vali oʻgʻli"), "aliyev vali");
        assert_eq!(normalize_name("Karimova Lola qizi"), "karimova lola");
        assert_eq!(normalize_name("Каримова Лола қизи"), "каримова лола");
        // only standalone tokens are removed
        assert_eq!(normalize_name("Qizilov Anvar"), "qizilov anvar");
    }

    #[test]
    fn test_suffix_in_the_middle_leaves_single_spaces() {
        assert_eq!(normalize_name("Aliyev o'g'li Vali"), "aliyev vali");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "  Aliyev   Vali o'g'li ",
            "Karimova Lola QIZI",
            "a qizi b",
            "x-o'g'li-y",
            "Ёқубов  Ўткир",
            "",
        ];
        for raw in samples {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_shorten_teacher_name() {
        assert_eq!(
            shorten_teacher_name("Karimova Dilnoza Baxtiyorovna"),
            "Karimova D.B."
        );
        assert_eq!(shorten_teacher_name("Karimova   Dilnoza"), "Karimova D.");
        assert_eq!(shorten_teacher_name("Karimova"), "Karimova");
        assert_eq!(shorten_teacher_name("  Karimova  "), "Karimova");
        assert_eq!(shorten_teacher_name(""), "");
        assert_eq!(
            shorten_teacher_name("Каримова Дилноза Бахтиёровна"),
            "Каримова Д.Б."
        );
    }

    #[test]
    fn test_shorten_collapses_doubled_periods() {
        assert_eq!(shorten_teacher_name("Karimova . B"), "Karimova .B.");
    }
}
