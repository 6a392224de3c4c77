//! Pattern-based generation.
//!
//! A pattern is first expanded ([`expand`]) and then interpreted one
//! character at a time:
//!
//! | Syntax     | Meaning                                              |
//! |------------|------------------------------------------------------|
//! | `d`, `u`.. | one character drawn from the named class             |
//! | `\X`       | literal `X`                                          |
//! | `[..]`     | one character drawn from the union of the contents   |
//! | `^X`       | inside `[..]`: remove `X` from the class being built |
//! | `X{n}`     | `X` repeated `n` times (resolved by [`expand`])      |
//! | other      | itself, literally                                    |

use zeroize::Zeroizing;

use super::PasswordError;
use crate::charset::CharSet;
use crate::profile::GenerationProfile;
use crate::random::RandomEngine;
use crate::sanitize;
use crate::secret::ProtectedSecret;

/// Upper bound on the length of an expanded pattern, in characters.
pub const MAX_EXPANDED_CHARS: usize = 1 << 16;

/// Interpreter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InCustomClass,
}

/// Resolves `{n}` repetitions.
///
/// Each round finds the first unescaped `{` and `}`; if the brace comes
/// first, the span is deleted and, when its content is a non-negative
/// integer and a character precedes it, that character is repeated so
/// it appears `n` times (`n = 0` deletes it). Anything else is left for
/// the interpreter to treat literally.
///
/// Fails with [`PasswordError::InvalidPattern`] if a repetition would
/// grow the pattern past [`MAX_EXPANDED_CHARS`].
pub fn expand(pattern: &str) -> Result<String, PasswordError> {
    let mut chars: Vec<char> = pattern.chars().collect();

    loop {
        let (Some(open), Some(close)) = (
            find_first_unescaped(&chars, '{'),
            find_first_unescaped(&chars, '}'),
        ) else {
            break;
        };
        if open >= close {
            break;
        }

        let count: String = chars[open + 1..close].iter().collect();
        chars.drain(open..=close);

        let Ok(repeat) = count.trim_matches(is_count_padding).parse::<u32>() else {
            continue;
        };
        if open == 0 {
            continue;
        }

        if repeat == 0 {
            chars.remove(open - 1);
        } else {
            let extra = repeat as usize - 1;
            if chars.len().saturating_add(extra) > MAX_EXPANDED_CHARS {
                return Err(PasswordError::InvalidPattern(format!(
                    "repetition {{{repeat}}} expands past {MAX_EXPANDED_CHARS} characters"
                )));
            }
            let prev = chars[open - 1];
            let copies = std::iter::repeat(prev).take(extra);
            chars.splice(open..open, copies);
        }
    }

    Ok(chars.into_iter().collect())
}

/// Whitespace accepted around a repetition count: tab through CR, and
/// space.
fn is_count_padding(ch: char) -> bool {
    matches!(ch, '\t'..='\r' | ' ')
}

/// Index of the first `target` not preceded by an escaping backslash.
fn find_first_unescaped(chars: &[char], target: char) -> Option<usize> {
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 1,
            ch if ch == target => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Generates a password from `profile.pattern`.
///
/// Fails with [`PasswordError::TooFewCharacters`] as soon as a position
/// has no usable character left, and with
/// [`PasswordError::InvalidCharSet`] if a drawn class holds a
/// disallowed character. An oversized repetition fails with
/// [`PasswordError::InvalidPattern`] before anything is drawn.
pub fn generate(
    profile: &GenerationProfile,
    rng: &mut RandomEngine,
) -> Result<ProtectedSecret, PasswordError> {
    let pattern: Vec<char> = expand(&profile.pattern)?.chars().collect();
    if pattern.is_empty() {
        return Ok(ProtectedSecret::empty());
    }

    // Each step emits at most one character, so this never reallocates.
    let mut output: Zeroizing<Vec<char>> = Zeroizing::new(Vec::with_capacity(pattern.len()));
    let mut current = CharSet::new();
    let mut custom = CharSet::new();
    // Holds generated characters; sized so it never reallocates.
    let mut used = CharSet::with_capacity(pattern.len() * 2);
    let mut state = State::Normal;

    // NUL ends the pattern, including right after `\` or `^`.
    let mut input = pattern.iter().copied().take_while(|&ch| ch != '\0');
    while let Some(ch) = input.next() {
        current.clear();
        let mut generate_now = false;

        match (ch, state) {
            ('\\', _) => {
                let Some(escaped) = input.next() else {
                    output.push('\\');
                    break;
                };
                if state == State::InCustomClass {
                    custom.add(escaped);
                } else {
                    output.push(escaped);
                    used.add(escaped);
                }
            }
            ('^', _) => {
                let Some(removed) = input.next() else {
                    output.push('^');
                    break;
                };
                if state == State::InCustomClass {
                    custom.remove(removed);
                }
            }
            ('[', _) => {
                custom.clear();
                state = State::InCustomClass;
            }
            (']', _) => {
                current.extend_from(&custom);
                state = State::Normal;
                generate_now = true;
            }
            (_, State::InCustomClass) => {
                if !custom.add_class(ch) {
                    custom.add(ch);
                }
            }
            (_, State::Normal) => {
                if current.add_class(ch) {
                    generate_now = true;
                } else {
                    output.push(ch);
                    used.add(ch);
                }
            }
        }

        if generate_now {
            sanitize::prepare(&mut current, profile)?;

            if profile.no_repeating_characters {
                for unit in used.units() {
                    current.remove_unit(unit);
                }
            }

            let generated = rng
                .generate_character(&current)
                .ok_or(PasswordError::TooFewCharacters)?;
            output.push(generated);
            used.add(generated);
        }
    }

    if output.is_empty() {
        return Ok(ProtectedSecret::empty());
    }

    if profile.permute_result {
        rng.shuffle(output.as_mut_slice());
    }

    Ok(ProtectedSecret::from_chars(&output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::classes;
    use proptest::prelude::*;
    use std::collections::{HashMap, HashSet};

    fn engine(seed: u8) -> RandomEngine {
        RandomEngine::from_seed_for_testing([seed; 32])
    }

    fn run(pattern: &str) -> Result<String, PasswordError> {
        run_with(GenerationProfile::with_pattern(pattern), 0x21)
    }

    fn run_with(profile: GenerationProfile, seed: u8) -> Result<String, PasswordError> {
        generate(&profile, &mut engine(seed)).map(|s| s.expose().to_owned())
    }

    #[test]
    fn test_expand_repetition() {
        assert_eq!(expand("a{3}").unwrap(), "aaa");
        assert_eq!(expand("a{0}").unwrap(), "");
        assert_eq!(expand("x{2}y").unwrap(), "xxy");
        assert_eq!(expand("d{4}-u{2}").unwrap(), "dddd-uu");
        assert_eq!(expand("a{1}").unwrap(), "a");
        assert_eq!(expand("a{ 2 }").unwrap(), "aa");
    }

    #[test]
    fn test_expand_without_effect() {
        // no preceding character: span deleted
        assert_eq!(expand("{3}a").unwrap(), "a");
        // count not a number: span deleted
        assert_eq!(expand("a{x}b").unwrap(), "ab");
        assert_eq!(expand("a{-1}b").unwrap(), "ab");
        // unmatched or reversed braces stay literal
        assert_eq!(expand("a{3").unwrap(), "a{3");
        assert_eq!(expand("a}3{").unwrap(), "a}3{");
        assert_eq!(expand("").unwrap(), "");
    }

    #[test]
    fn test_expand_skips_escaped_braces() {
        assert_eq!(expand(r"\{5\}").unwrap(), r"\{5\}");
        assert_eq!(expand(r"\{a{2}").unwrap(), r"\{aa");
        // the repeated character may itself be escaped
        assert_eq!(expand(r"\d{3}").unwrap(), r"\ddd");
    }

    #[test]
    fn test_expand_nested_rounds() {
        // one span per round, leftmost first
        assert_eq!(expand("ab{2}c{3}").unwrap(), "abbccc");
    }

    #[test]
    fn test_expand_count_padding() {
        assert_eq!(expand("a{\t3\n}").unwrap(), "aaa");
        assert_eq!(expand("a{\u{B}2}").unwrap(), "aa");
        // non-ASCII whitespace makes the count invalid
        assert_eq!(expand("a{\u{A0}2}b").unwrap(), "ab");
        assert_eq!(expand("a{\u{3000}2}b").unwrap(), "ab");
    }

    #[test]
    fn test_expand_rejects_oversized_repetition() {
        assert!(matches!(
            expand("d{4000000000}"),
            Err(PasswordError::InvalidPattern(_))
        ));
        assert!(matches!(
            expand("d{65536}d"),
            Err(PasswordError::InvalidPattern(_))
        ));
        assert_eq!(expand("d{65536}").unwrap().chars().count(), MAX_EXPANDED_CHARS);
    }

    #[test]
    fn test_oversized_repetition_fails_before_drawing() {
        let profile = GenerationProfile {
            exclude_characters: classes::DIGITS.to_owned(),
            ..GenerationProfile::with_pattern("d{4000000000}")
        };
        let mut rng = engine(0x22);
        assert!(matches!(
            generate(&profile, &mut rng),
            Err(PasswordError::InvalidPattern(_))
        ));
        assert_eq!(rng.bytes_consumed(), 0);
    }

    #[test]
    fn test_nul_ends_pattern() {
        let out = run("d\u{0}d").unwrap();
        assert_eq!(out.chars().count(), 1);
        assert!(out.chars().all(|c| c.is_ascii_digit()));

        assert_eq!(run("-\\\u{0}x").unwrap(), "-\\");
        assert_eq!(run("-^\u{0}x").unwrap(), "-^");
        assert_eq!(run("\u{0}dd").unwrap(), "");
        assert!(!run("[\u{0}]d").unwrap().contains('\0'));
    }

    #[test]
    fn test_escaped_braces_are_literals() {
        assert_eq!(run(r"\{5\}").unwrap(), "{5}");
    }

    #[test]
    fn test_literals_pass_through() {
        assert_eq!(run("-+=!").unwrap(), "-+=!");
        assert_eq!(run(r"\d\u").unwrap(), "du");
    }

    #[test]
    fn test_trailing_escape_and_caret() {
        assert_eq!(run("-\\").unwrap(), "-\\");
        assert_eq!(run("-^").unwrap(), "-^");
    }

    #[test]
    fn test_caret_outside_class_consumes_next() {
        assert_eq!(run("-^x-").unwrap(), "--");
    }

    #[test]
    fn test_lowercase_class() {
        let out = run("llll").unwrap();
        assert_eq!(out.chars().count(), 4);
        assert!(out.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_independent_generations_differ() {
        let mut seen = HashSet::new();
        for seed in 0..50u8 {
            let profile = GenerationProfile::with_pattern("l{16}");
            seen.insert(run_with(profile, seed).unwrap());
        }
        assert_eq!(seen.len(), 50);
    }

    #[test]
    fn test_mixed_template() {
        let out = run("u{2}-d{3}").unwrap();
        let chars: Vec<char> = out.chars().collect();
        assert_eq!(chars.len(), 6);
        assert!(chars[..2].iter().all(|c| c.is_ascii_uppercase()));
        assert_eq!(chars[2], '-');
        assert!(chars[3..].iter().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_custom_class_literals_uniform() {
        let mut rng = engine(0x31);
        let profile = GenerationProfile::with_pattern("[!?#]");
        let mut counts: HashMap<String, u32> = HashMap::new();

        for _ in 0..3_000 {
            let secret = generate(&profile, &mut rng).unwrap();
            *counts.entry(secret.expose().to_owned()).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        for key in ["!", "?", "#"] {
            let count = counts[key];
            assert!((800..=1200).contains(&count), "{key}: {count}");
        }
    }

    #[test]
    fn test_custom_class_with_classes_and_removal() {
        for seed in 0..20u8 {
            let profile = GenerationProfile::with_pattern("[d^0^1^2^3^4^5^6^7^8]");
            assert_eq!(run_with(profile, seed).unwrap(), "9");
        }

        let out = run("[h\\]]").unwrap();
        assert!(classes::LOWER_HEX.contains(&out) || out == "]");
    }

    #[test]
    fn test_empty_custom_class_fails() {
        assert!(matches!(run("[]"), Err(PasswordError::TooFewCharacters)));
        assert!(matches!(run("[!^!]"), Err(PasswordError::TooFewCharacters)));
    }

    #[test]
    fn test_stray_close_reuses_last_class() {
        assert!(matches!(run("]"), Err(PasswordError::TooFewCharacters)));
        assert_eq!(run("[1]]").unwrap(), "11");
    }

    #[test]
    fn test_no_repeat_exhausts_class() {
        let profile = GenerationProfile {
            no_repeating_characters: true,
            ..GenerationProfile::with_pattern("d{11}")
        };
        assert!(matches!(
            run_with(profile, 0x41),
            Err(PasswordError::TooFewCharacters)
        ));

        let profile = GenerationProfile {
            no_repeating_characters: true,
            ..GenerationProfile::with_pattern("d{10}")
        };
        let out = run_with(profile, 0x41).unwrap();
        let unique: HashSet<char> = out.chars().collect();
        assert_eq!(unique.len(), 10);
    }

    #[test]
    fn test_no_repeat_respects_literals() {
        for seed in 0..20u8 {
            let profile = GenerationProfile {
                no_repeating_characters: true,
                ..GenerationProfile::with_pattern("012345678d")
            };
            assert_eq!(run_with(profile, seed).unwrap(), "0123456789");
        }
    }

    #[test]
    fn test_exclusions_apply_to_classes() {
        let profile = GenerationProfile {
            exclude_characters: "abcdefghijklmnopqrstuvwxy".to_owned(),
            ..GenerationProfile::with_pattern("lll")
        };
        assert_eq!(run_with(profile, 0x51).unwrap(), "zzz");
    }

    #[test]
    fn test_exclusions_do_not_touch_literals() {
        let profile = GenerationProfile {
            exclude_characters: "-".to_owned(),
            ..GenerationProfile::with_pattern("---")
        };
        assert_eq!(run_with(profile, 0x52).unwrap(), "---");
    }

    #[test]
    fn test_empty_pattern() {
        assert_eq!(run("").unwrap(), "");
        assert_eq!(run("a{0}").unwrap(), "");
    }

    #[test]
    fn test_permute_keeps_multiset() {
        let profile = GenerationProfile {
            permute_result: true,
            ..GenerationProfile::with_pattern("ddd-+=")
        };
        for seed in 0..10u8 {
            let out = run_with(profile.clone(), seed).unwrap();
            let chars: Vec<char> = out.chars().collect();
            assert_eq!(chars.len(), 6);
            assert_eq!(chars.iter().filter(|c| c.is_ascii_digit()).count(), 3);
            assert!("-+=".chars().all(|c| chars.contains(&c)));
        }
    }

    #[test]
    fn test_permute_uniform_over_orderings() {
        let mut rng = engine(0x61);
        let profile = GenerationProfile {
            permute_result: true,
            ..GenerationProfile::with_pattern("-+=")
        };

        let mut counts: HashMap<String, u32> = HashMap::new();
        for _ in 0..6_000 {
            let secret = generate(&profile, &mut rng).unwrap();
            *counts.entry(secret.expose().to_owned()).or_default() += 1;
        }

        assert_eq!(counts.len(), 6);
        for (order, count) in counts {
            assert!((800..=1200).contains(&count), "{order}: {count}");
        }
    }

    proptest! {
        #[test]
        fn prop_expand_without_braces_is_identity(s in "[a-zA-Z0-9\\\\\\[\\]^ -]{0,40}") {
            prop_assert_eq!(expand(&s).unwrap(), s);
        }

        #[test]
        fn prop_repetition_count(ch in "[a-z]", n in 0u32..50) {
            let expanded = expand(&format!("{ch}{{{n}}}")).unwrap();
            prop_assert_eq!(expanded.chars().count(), n as usize);
        }
    }
}
