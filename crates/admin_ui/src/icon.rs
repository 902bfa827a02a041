//! Centralized icon set rendered as inline SVG.
//!
//! Call sites name icons semantically through [`IconName`]; the glyph paths live here only.

use leptos::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Semantic icon identifiers used by admin screens.
pub enum IconName {
    /// View/show record.
    Eye,
    /// Edit record.
    Pencil,
    /// Delete record.
    Trash,
    /// Create record.
    Plus,
    /// Search input.
    Search,
    /// Close dialog or dismiss.
    Close,
    /// Boolean true / confirmation.
    Check,
    /// Boolean false.
    Cross,
    /// File upload.
    Upload,
    /// Unsorted column.
    Sort,
    /// Ascending column.
    SortUp,
    /// Descending column.
    SortDown,
    /// Previous page.
    ChevronLeft,
    /// Next page.
    ChevronRight,
    /// Filter toggle.
    Filter,
    /// Reload list.
    Refresh,
    /// Informational toast.
    Info,
    /// Warning toast.
    Warning,
}

impl IconName {
    /// Stable token written to `data-ui-icon`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eye => "eye",
            Self::Pencil => "pencil",
            Self::Trash => "trash",
            Self::Plus => "plus",
            Self::Search => "search",
            Self::Close => "close",
            Self::Check => "check",
            Self::Cross => "x",
            Self::Upload => "upload",
            Self::Sort => "sort",
            Self::SortUp => "sort-up",
            Self::SortDown => "sort-down",
            Self::ChevronLeft => "chevron-left",
            Self::ChevronRight => "chevron-right",
            Self::Filter => "filter",
            Self::Refresh => "refresh",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }

    /// Resolves a token back to an icon; used for icon names carried in configuration.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.token() == token)
    }

    /// Every icon, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Eye,
        Self::Pencil,
        Self::Trash,
        Self::Plus,
        Self::Search,
        Self::Close,
        Self::Check,
        Self::Cross,
        Self::Upload,
        Self::Sort,
        Self::SortUp,
        Self::SortDown,
        Self::ChevronLeft,
        Self::ChevronRight,
        Self::Filter,
        Self::Refresh,
        Self::Info,
        Self::Warning,
    ];

    fn paths(self) -> &'static [&'static str] {
        match self {
            Self::Eye => &[
                "M2 12s3.6-7 10-7 10 7 10 7-3.6 7-10 7S2 12 2 12z",
                "M12 9a3 3 0 1 0 0 6 3 3 0 0 0 0-6z",
            ],
            Self::Pencil => &["M4 20h4L19 9l-4-4L4 16v4z", "M14 6l4 4"],
            Self::Trash => &["M4 7h16", "M9 7V4h6v3", "M6 7l1 13h10l1-13", "M10 11v6M14 11v6"],
            Self::Plus => &["M12 5v14M5 12h14"],
            Self::Search => &["M11 4a7 7 0 1 0 0 14 7 7 0 0 0 0-14z", "M20 20l-4-4"],
            Self::Close | Self::Cross => &["M6 6l12 12M18 6L6 18"],
            Self::Check => &["M5 12l5 5L20 7"],
            Self::Upload => &["M12 16V4", "M7 9l5-5 5 5", "M4 20h16"],
            Self::Sort => &["M8 10l4-5 4 5", "M8 14l4 5 4-5"],
            Self::SortUp => &["M8 14l4-5 4 5"],
            Self::SortDown => &["M8 10l4 5 4-5"],
            Self::ChevronLeft => &["M15 6l-6 6 6 6"],
            Self::ChevronRight => &["M9 6l6 6-6 6"],
            Self::Filter => &["M4 5h16l-6 8v5l-4 2v-7L4 5z"],
            Self::Refresh => &["M20 11a8 8 0 1 0-2.3 5.7", "M20 5v6h-6"],
            Self::Info => &["M12 3a9 9 0 1 0 0 18 9 9 0 0 0 0-18z", "M12 11v6M12 7v.5"],
            Self::Warning => &["M12 3L2 21h20L12 3z", "M12 10v5M12 18v.5"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Icon sizing tokens.
pub enum IconSize {
    /// 14px glyph.
    Xs,
    /// 16px glyph.
    Sm,
    /// 20px glyph.
    #[default]
    Md,
    /// 28px glyph.
    Lg,
}

impl IconSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }

    fn pixels(self) -> u8 {
        match self {
            Self::Xs => 14,
            Self::Sm => 16,
            Self::Md => 20,
            Self::Lg => 28,
        }
    }
}

#[component]
/// Decorative inline SVG icon. Pair with an accessible label on the owning control.
pub fn Icon(icon: IconName, #[prop(default = IconSize::Md)] size: IconSize) -> impl IntoView {
    let pixels = size.pixels();
    let paths = icon
        .paths()
        .iter()
        .map(|d| view! { <path d=*d></path> })
        .collect_view();

    view! {
        <svg
            class="ui-icon"
            width=pixels
            height=pixels
            viewBox="0 0 24 24"
            fill="none"
            stroke="currentColor"
            stroke-width="2"
            stroke-linecap="round"
            stroke-linejoin="round"
            aria-hidden="true"
            focusable="false"
            data-ui-primitive="true"
            data-ui-kind="icon"
            data-ui-icon=icon.token()
            data-ui-size=size.token()
        >
            {paths}
        </svg>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn icon_tokens_resolve_back_to_icons() {
        for icon in IconName::ALL {
            assert_eq!(IconName::from_token(icon.token()), Some(icon));
            assert!(!icon.paths().is_empty(), "{icon:?} has no glyph");
        }
        assert_eq!(IconName::from_token("sort-up"), Some(IconName::SortUp));
        assert_eq!(IconName::from_token("unknown"), None);
    }
}
