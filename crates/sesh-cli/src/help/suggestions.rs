//! "Did you mean" suggestions for mistyped names.

/// Suggest the closest of `available` to a mistyped `input`.
pub fn suggest_command(input: &str, available: &[&str]) -> Option<String> {
    let input_lower = input.to_lowercase();

    let mut best_match: Option<(&str, usize)> = None;

    for &candidate in available {
        let distance = levenshtein(&input_lower, &candidate.to_lowercase());

        // At most half of the longer word may differ
        let longest = input.chars().count().max(candidate.chars().count());
        if distance <= longest / 2 {
            match best_match {
                Some((_, best)) if distance >= best => {}
                _ => best_match = Some((candidate, distance)),
            }
        }
    }

    best_match.map(|(candidate, _)| format!("Did you mean '{candidate}'?"))
}

/// Calculate Levenshtein distance between two strings
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<_> = a.chars().collect();
    let b_chars: Vec<_> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("format", "format"), 0);
        assert_eq!(levenshtein("formt", "format"), 1);
        assert_eq!(levenshtein("fromat", "format"), 2);
        assert_eq!(levenshtein("", "list"), 4);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }

    #[test]
    fn test_suggest_command() {
        let tasks = ["format", "shell_completion"];

        assert_eq!(
            suggest_command("fmt", &tasks),
            Some("Did you mean 'format'?".to_string())
        );
        assert_eq!(
            suggest_command("Shell_Completon", &tasks),
            Some("Did you mean 'shell_completion'?".to_string())
        );
        assert!(suggest_command("xyz", &tasks).is_none());
        assert!(suggest_command("fmt", &[]).is_none());
    }
}
