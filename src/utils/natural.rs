//! String ordering helpers for port addresses and board names

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Case-insensitive natural comparison.
///
/// Runs of ASCII digits are compared by numeric value, so `COM2` sorts
/// before `COM10` and `/dev/ttyACM9` before `/dev/ttyACM10`.
pub fn natural_compare(left: &str, right: &str) -> Ordering {
    let mut left = left.chars().peekable();
    let mut right = right.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let result = compare_digit_runs(&l_run, &r_run);
                if result != Ordering::Equal {
                    return result;
                }
            }
            (Some(l), Some(r)) => {
                let result = l.to_lowercase().cmp(r.to_lowercase());
                if result != Ordering::Equal {
                    return result;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Locale-style comparison: case-insensitive first, lowercase before
/// uppercase when the strings only differ in case.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| right.cmp(left))
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(left: &str, right: &str) -> Ordering {
    let left = left.trim_start_matches('0');
    let right = right.trim_start_matches('0');
    left.len().cmp(&right.len()).then_with(|| left.cmp(right))
}
