// File name sanitising for scaffolded projects

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Device names Windows refuses as file or directory names
const RESERVED_NAMES: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Turn a user-supplied name into a path component.
///
/// Characters that are invalid in Windows file names become `-`, control
/// characters are dropped, and spaces optionally become `-`. Reserved device
/// names are rejected on Windows.
pub fn to_path(name: &str, replace_spaces: bool) -> Result<PathBuf> {
    if cfg!(windows) && is_reserved_name(name) {
        return Err(Error::scaffold(format!(
            "invalid directory name {:?}, use a different one",
            name
        )));
    }

    let cleaned: String = name
        .chars()
        .filter_map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => Some('-'),
            ' ' if replace_spaces => Some('-'),
            c if (c as u32) < 32 => None,
            c => Some(c),
        })
        .collect();

    Ok(PathBuf::from(cleaned))
}

pub fn is_reserved_name(name: &str) -> bool {
    name.chars().count() <= 4 && RESERVED_NAMES.contains(&name.to_uppercase().as_str())
}

/// Class name for a cog file stem: `my_cog` and `my-cog` become `MyCog`,
/// anything else is title-cased
pub fn cog_class_name(stem: &str) -> String {
    if stem.contains(['-', '_']) {
        title_case(&stem.replace(['-', '_'], " ")).replace(' ', "")
    } else {
        title_case(stem)
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }

    out
}
