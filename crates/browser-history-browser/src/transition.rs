//! Decoding of browser-recorded navigation transitions into labels.
//!
//! Chromium packs a core transition type into the low byte of `visits.transition`
//! and qualifier flags into the high bits. Firefox stores a plain enum in
//! `moz_historyvisits.visit_type`.

const CHROMIUM_CORE_MASK: u32 = 0xFF;

/// Chromium core transition types, indexed by value
const CHROMIUM_CORE_TYPES: [&str; 11] = [
    "LINK",
    "TYPED",
    "AUTO_BOOKMARK",
    "AUTO_SUBFRAME",
    "MANUAL_SUBFRAME",
    "GENERATED",
    "AUTO_TOPLEVEL",
    "FORM_SUBMIT",
    "RELOAD",
    "KEYWORD",
    "KEYWORD_GENERATED",
];

/// Chromium qualifier flags in display priority order; only the first set flag is shown
const CHROMIUM_QUALIFIERS: [(u32, &str); 4] = [
    (0x8000_0000, "SERVER_REDIRECT"),
    (0x4000_0000, "CLIENT_REDIRECT"),
    (0x0100_0000, "FORWARD_BACK"),
    (0x0200_0000, "FROM_ADDRESS_BAR"),
];

/// Firefox visit types, starting at 1
const GECKO_VISIT_TYPES: [&str; 9] = [
    "LINK",
    "TYPED",
    "BOOKMARK",
    "EMBED",
    "REDIRECT_PERMANENT",
    "REDIRECT_TEMPORARY",
    "DOWNLOAD",
    "FRAMED_LINK",
    "RELOAD",
];

/// Label for a packed Chromium transition value, e.g. `LINK (SERVER_REDIRECT)`
pub fn chromium_label(raw: i64) -> String {
    // Stored as a 32-bit bitfield; older databases sign-extend it
    let bits = raw as u32;
    let core = bits & CHROMIUM_CORE_MASK;

    let mut label = match CHROMIUM_CORE_TYPES.get(core as usize) {
        Some(name) => name.to_string(),
        None => format!("UNKNOWN ({})", core),
    };

    if let Some((_, qualifier)) = CHROMIUM_QUALIFIERS
        .iter()
        .find(|(flag, _)| bits & flag != 0)
    {
        label.push_str(&format!(" ({})", qualifier));
    }

    label
}

/// Label for a Firefox `visit_type` value
pub fn gecko_label(raw: i64) -> String {
    usize::try_from(raw)
        .ok()
        .and_then(|value| value.checked_sub(1))
        .and_then(|index| GECKO_VISIT_TYPES.get(index))
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("UNKNOWN ({})", raw))
}
