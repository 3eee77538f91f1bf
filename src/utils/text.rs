pub fn truncate_with_ellipsis(input: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }

    let chars: Vec<char> = input.chars().collect();
    if chars.len() <= max_chars {
        return input.to_string();
    }
    if max_chars == 1 {
        return ".".to_string();
    }

    let mut out = chars[..max_chars - 1].iter().collect::<String>();
    out.push('…');
    out
}

/// `12.3 KB`, `4.0 MB`, `1.25 GB`. Absent or zero sizes render empty.
pub fn human_size(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes.filter(|b| *b > 0) else {
        return String::new();
    };

    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.1} KB");
    }
    let mb = kb / 1024.0;
    if mb < 1024.0 {
        return format!("{mb:.1} MB");
    }
    format!("{:.2} GB", mb / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_input() {
        assert_eq!(truncate_with_ellipsis("Notes", 10), "Notes");
        assert_eq!(truncate_with_ellipsis("Notebook", 5), "Note…");
        assert_eq!(truncate_with_ellipsis("Notebook", 1), ".");
        assert_eq!(truncate_with_ellipsis("Notebook", 0), "");
    }

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(None), "");
        assert_eq!(human_size(Some(0)), "");
        assert_eq!(human_size(Some(512)), "0.5 KB");
        assert_eq!(human_size(Some(5 * 1024 * 1024)), "5.0 MB");
        assert_eq!(human_size(Some(3 * 1024 * 1024 * 1024 / 2)), "1.50 GB");
    }
}
