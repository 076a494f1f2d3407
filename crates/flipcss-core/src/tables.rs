//! Static rewrite tables.
//!
//! The flip engine only interprets these tables; adding a directional
//! property means adding a row here.

/// Properties whose name encodes a side. Each pair mirrors both ways.
pub const PROPERTY_PAIRS: &[(&str, &str)] = &[
    ("left", "right"),
    ("margin-left", "margin-right"),
    ("padding-left", "padding-right"),
    ("border-left", "border-right"),
    ("border-left-width", "border-right-width"),
    ("border-left-style", "border-right-style"),
    ("border-left-color", "border-right-color"),
    ("border-top-left-radius", "border-top-right-radius"),
    ("border-bottom-left-radius", "border-bottom-right-radius"),
    ("-webkit-border-top-left-radius", "-webkit-border-top-right-radius"),
    ("-webkit-border-bottom-left-radius", "-webkit-border-bottom-right-radius"),
    ("-moz-border-radius-topleft", "-moz-border-radius-topright"),
    ("-moz-border-radius-bottomleft", "-moz-border-radius-bottomright"),
];

/// Value keywords that mirror. Each pair mirrors both ways.
pub const KEYWORD_PAIRS: &[(&str, &str)] = &[
    ("left", "right"),
    ("e-resize", "w-resize"),
    ("ne-resize", "nw-resize"),
    ("se-resize", "sw-resize"),
];

/// Properties whose value keywords are mirrored through [`KEYWORD_PAIRS`].
/// `direction` is intentionally absent.
pub const KEYWORD_PROPERTIES: &[&str] = &[
    "float",
    "clear",
    "text-align",
    "text-align-last",
    "cursor",
    "background",
    "background-position",
    "background-position-x",
    "object-position",
    "transform-origin",
    "perspective-origin",
    "mask-position",
];

/// Properties whose horizontal component may be a numeric offset that
/// cannot be mirrored syntactically.
pub const POSITION_PROPERTIES: &[&str] = &["background-position", "background-position-x"];

/// Pseudo-elements swapped when pseudo swapping is enabled.
pub const PSEUDO_PAIRS: &[(&str, &str)] = &[("before", "after")];

/// Words mirrored inside selectors and `url()`.
pub const DIRECTION_WORDS: &[(&str, &str)] = &[("left", "right")];

/// How a shorthand orders its positional components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shorthand {
    /// top right bottom left: slots 1 and 3 swap when all four are given.
    Box,
    /// top-left top-right bottom-right bottom-left corners, with an optional
    /// `/` separating horizontal and vertical radii.
    Radius,
}

pub const SHORTHANDS: &[(&str, Shorthand)] = &[
    ("margin", Shorthand::Box),
    ("padding", Shorthand::Box),
    ("border-width", Shorthand::Box),
    ("border-style", Shorthand::Box),
    ("border-color", Shorthand::Box),
    ("inset", Shorthand::Box),
    ("border-radius", Shorthand::Radius),
    ("-webkit-border-radius", Shorthand::Radius),
    ("-moz-border-radius", Shorthand::Radius),
];

/// New slot order for a corner list of the given length; `None` when the
/// list is symmetric. Entries index into the original slots.
pub fn radius_permutation(len: usize) -> Option<&'static [usize]> {
    match len {
        2 => Some(&[1, 0]),
        3 => Some(&[1, 0, 1, 2]),
        4 => Some(&[1, 0, 3, 2]),
        _ => None,
    }
}

/// Box shorthands swap these two slots.
pub const BOX_SWAP: (usize, usize) = (1, 3);

fn lookup_pair(pairs: &'static [(&'static str, &'static str)], name: &str) -> Option<&'static str> {
    pairs.iter().find_map(|&(a, b)| {
        if name.eq_ignore_ascii_case(a) {
            Some(b)
        } else if name.eq_ignore_ascii_case(b) {
            Some(a)
        } else {
            None
        }
    })
}

pub fn mirror_property(name: &str) -> Option<&'static str> {
    lookup_pair(PROPERTY_PAIRS, name)
}

pub fn mirror_keyword(word: &str) -> Option<&'static str> {
    lookup_pair(KEYWORD_PAIRS, word)
}

pub fn mirror_pseudo(name: &str) -> Option<&'static str> {
    lookup_pair(PSEUDO_PAIRS, name)
}

pub fn mirror_word(word: &str) -> Option<&'static str> {
    lookup_pair(DIRECTION_WORDS, word)
}

pub fn shorthand(name: &str) -> Option<Shorthand> {
    SHORTHANDS
        .iter()
        .find(|(prop, _)| name.eq_ignore_ascii_case(prop))
        .map(|&(_, kind)| kind)
}

pub fn has_keyword_values(name: &str) -> bool {
    KEYWORD_PROPERTIES.iter().any(|p| name.eq_ignore_ascii_case(p))
}

pub fn is_position_property(name: &str) -> bool {
    POSITION_PROPERTIES.iter().any(|p| name.eq_ignore_ascii_case(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_pairs_mirror_both_ways() {
        for &(a, b) in PROPERTY_PAIRS {
            assert_eq!(mirror_property(a), Some(b));
            assert_eq!(mirror_property(b), Some(a));
        }
        assert_eq!(mirror_property("Margin-Left"), Some("margin-right"));
        assert_eq!(mirror_property("margin-top"), None);
        assert_eq!(mirror_property("direction"), None);
    }

    #[test]
    fn properties_are_not_both_renamed_and_shorthands() {
        for &(a, b) in PROPERTY_PAIRS {
            assert!(shorthand(a).is_none() && shorthand(b).is_none());
        }
    }

    #[test]
    fn keywords() {
        assert_eq!(mirror_keyword("LEFT"), Some("right"));
        assert_eq!(mirror_keyword("nw-resize"), Some("ne-resize"));
        assert_eq!(mirror_keyword("center"), None);
        assert!(has_keyword_values("Float"));
        assert!(!has_keyword_values("direction"));
    }

    #[test]
    fn radius_permutations_are_complete() {
        for len in 2..=4 {
            let perm = radius_permutation(len).expect("permutation");
            assert!(perm.len() >= len);
            assert!(perm.iter().all(|&idx| idx < len));
        }
        assert!(radius_permutation(1).is_none());
    }

    #[test]
    fn shorthands() {
        assert_eq!(shorthand("MARGIN"), Some(Shorthand::Box));
        assert_eq!(shorthand("border-radius"), Some(Shorthand::Radius));
        assert_eq!(shorthand("border"), None);
    }
}
