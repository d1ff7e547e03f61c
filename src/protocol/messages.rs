//! Localized, user-facing error messages.
//!
//! The table maps a status category to a message that a UI can show as-is. Server-supplied
//! detail text always wins over the table, except for status `0`, which means the server was
//! never reached.
//!
//! | Status | Category |
//! |--------|----------|
//! | 400, 401, 403, 404, 408, 409, 422, 429 | one message each |
//! | 5xx | server unavailable |
//! | 0 | could not connect |
//! | none, aborted | request aborted or timed out |
//! | anything else | generic failure |
//!
//! # Examples
//!
//! ```
//! use invoice_api::protocol::{friendly_message, Locale};
//!
//! let msg = friendly_message(Locale::English, Some(404), None, false);
//! assert_eq!(msg, "The requested record was not found.");
//!
//! let msg = friendly_message(Locale::English, Some(503), Some("Maintenance"), false);
//! assert_eq!(msg, "Maintenance");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the messages carried by [`ApiError`](crate::ApiError).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// Lithuanian (`lt`).
    #[default]
    #[serde(rename = "lt")]
    Lithuanian,
    /// English (`en`).
    #[serde(rename = "en")]
    English,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" | "lt-lt" | "lithuanian" => Ok(Locale::Lithuanian),
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::English),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Lithuanian => f.write_str("lt"),
            Locale::English => f.write_str("en"),
        }
    }
}

/// Message for one of the statuses with a dedicated entry.
pub fn status_message(locale: Locale, status: u16) -> Option<&'static str> {
    let msg = match (locale, status) {
        (Locale::Lithuanian, 400) => "Neteisinga užklausa. Patikrinkite duomenis.",
        (Locale::Lithuanian, 401) => "Prisijunkite, kad galėtumėte tęsti.",
        (Locale::Lithuanian, 403) => "Neturite teisės atlikti šio veiksmo.",
        (Locale::Lithuanian, 404) => "Prašomas įrašas nerastas.",
        (Locale::Lithuanian, 408) => "Užklausa užtruko per ilgai. Bandykite dar kartą.",
        (Locale::Lithuanian, 409) => "Veiksmas negalimas dėl konflikto arba būsenos.",
        (Locale::Lithuanian, 422) => "Neteisingi duomenys. Patikrinkite formą.",
        (Locale::Lithuanian, 429) => "Per daug užklausų. Bandykite vėliau.",
        (Locale::English, 400) => "Invalid request. Please check the data.",
        (Locale::English, 401) => "Please sign in to continue.",
        (Locale::English, 403) => "You are not allowed to perform this action.",
        (Locale::English, 404) => "The requested record was not found.",
        (Locale::English, 408) => "The request took too long. Please try again.",
        (Locale::English, 409) => "The action is not possible due to a conflict or the current state.",
        (Locale::English, 422) => "Invalid data. Please check the form.",
        (Locale::English, 429) => "Too many requests. Please try again later.",
        _ => return None,
    };
    Some(msg)
}

pub(crate) fn server_unavailable(locale: Locale) -> &'static str {
    match locale {
        Locale::Lithuanian => "Serveris laikinai nepasiekiamas. Bandykite dar kartą.",
        Locale::English => "The server is temporarily unavailable. Please try again.",
    }
}

pub(crate) fn network_unreachable(locale: Locale) -> &'static str {
    match locale {
        Locale::Lithuanian => "Nepavyko prisijungti prie serverio. Patikrinkite interneto ryšį.",
        Locale::English => "Could not connect to the server. Check your internet connection.",
    }
}

pub(crate) fn aborted(locale: Locale) -> &'static str {
    match locale {
        Locale::Lithuanian => "Užklausa nutraukta arba baigėsi laikas.",
        Locale::English => "The request was aborted or timed out.",
    }
}

pub(crate) fn unexpected(locale: Locale) -> &'static str {
    match locale {
        Locale::Lithuanian => "Įvyko nenumatyta klaida. Bandykite dar kartą.",
        Locale::English => "An unexpected error occurred. Please try again.",
    }
}

pub(crate) fn invalid_request(locale: Locale, detail: &str) -> String {
    match locale {
        Locale::Lithuanian => format!("Neteisinga užklausos konfigūracija: {}", detail),
        Locale::English => format!("Invalid request configuration: {}", detail),
    }
}

/// Choose the message for a failed call.
///
/// * `status` - HTTP status, `Some(0)` for network failures, `None` when unknown
/// * `detail` - server-supplied text; used when non-empty, except for status `0`
/// * `aborted` - the attempt was cancelled; only consulted when no status matched
pub fn friendly_message(
    locale: Locale,
    status: Option<u16>,
    detail: Option<&str>,
    aborted: bool,
) -> String {
    let detail = detail.filter(|d| !d.is_empty());

    match status {
        Some(s) if s >= 500 => detail.unwrap_or(server_unavailable(locale)).to_string(),
        Some(s) if status_message(locale, s).is_some() => detail
            .or(status_message(locale, s))
            .unwrap_or_default()
            .to_string(),
        Some(0) => network_unreachable(locale).to_string(),
        _ if aborted => self::aborted(locale).to_string(),
        _ => detail.unwrap_or(unexpected(locale)).to_string(),
    }
}
