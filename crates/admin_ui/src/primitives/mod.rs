//! Structural, control, data-display, overlay, navigation, and layout primitives for admin screens.
//!
//! Every primitive stamps `data-ui-primitive="true"` plus a `data-ui-kind` token so the admin
//! stylesheet can target the contract instead of ad hoc class names.

use leptos::ev::{KeyboardEvent, MouseEvent};
use leptos::*;

use crate::{Icon, IconName, IconSize};

mod controls;
mod data_display;
mod layout;
mod navigation;
mod overlays;

pub use controls::{
    Button, CheckboxField, ColorField, ComboField, FieldGroup, FileField, IconButton,
    RadioGroup, SearchField, SelectField, SelectOptionItem, Switch, TextArea, TextField,
};
pub use data_display::{
    Badge, DataTable, EmptyState, Heading, Panel, SortHeader, Spinner, Surface, TableCell,
    TableRow, Text,
};
pub use layout::{Cluster, Grid, Stack};
pub use navigation::{page_window, PageSlot, Pagination, ToolBar};
pub use overlays::{Modal, ToastItem, ToastRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Semantic surface variants for structural primitives.
pub enum SurfaceVariant {
    /// Primary surface.
    #[default]
    Standard,
    /// Secondary or muted surface.
    Muted,
    /// Inset surface.
    Inset,
}

impl SurfaceVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Muted => "muted",
            Self::Inset => "inset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Elevation levels.
pub enum Elevation {
    /// Flat surface.
    #[default]
    Flat,
    /// Raised surface.
    Raised,
    /// Overlay surface (dialogs, toasts).
    Overlay,
}

impl Elevation {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Raised => "raised",
            Self::Overlay => "overlay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Button variants.
pub enum ButtonVariant {
    /// Standard action button.
    #[default]
    Standard,
    /// Primary emphasized action (save, create).
    Primary,
    /// Quiet button for secondary actions (cancel).
    Quiet,
    /// Destructive action (delete).
    Danger,
    /// Compact icon-only button.
    Icon,
}

impl ButtonVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Primary => "primary",
            Self::Quiet => "quiet",
            Self::Danger => "danger",
            Self::Icon => "icon",
        }
    }

    /// Maps a configured color token (`"danger"`, `"primary"`, ...) onto a variant.
    pub fn from_color(color: &str) -> Self {
        match color {
            "primary" | "info" | "success" => Self::Primary,
            "danger" | "error" => Self::Danger,
            "quiet" | "secondary" | "light" => Self::Quiet,
            _ => Self::Standard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Button sizing tokens.
pub enum ButtonSize {
    /// Dense button used in table rows.
    Sm,
    /// Default button.
    #[default]
    Md,
    /// Large button.
    Lg,
}

impl ButtonSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Input-field variants.
pub enum FieldVariant {
    /// Standard input.
    #[default]
    Standard,
    /// Inset input (filters, search).
    Inset,
}

impl FieldVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Inset => "inset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Text roles.
pub enum TextRole {
    /// Body text.
    #[default]
    Body,
    /// Label text.
    Label,
    /// Caption text.
    Caption,
    /// Title text.
    Title,
    /// Monospace text.
    Code,
}

impl TextRole {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Label => "label",
            Self::Caption => "caption",
            Self::Title => "title",
            Self::Code => "code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Text and badge tone.
pub enum TextTone {
    /// Primary text.
    #[default]
    Primary,
    /// Secondary text.
    Secondary,
    /// Accent text.
    Accent,
    /// Success tone.
    Success,
    /// Warning tone.
    Warning,
    /// Danger tone.
    Danger,
}

impl TextTone {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Maps a configured badge color token onto a tone.
    pub fn from_color(color: &str) -> Self {
        match color {
            "success" | "green" => Self::Success,
            "warning" | "yellow" => Self::Warning,
            "danger" | "error" | "red" => Self::Danger,
            "info" | "primary" | "blue" => Self::Accent,
            "secondary" | "gray" | "light" => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Layout gap tokens.
pub enum LayoutGap {
    /// No gap.
    None,
    /// Small gap.
    Sm,
    /// Default gap.
    #[default]
    Md,
    /// Large gap.
    Lg,
}

impl LayoutGap {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Layout padding tokens.
pub enum LayoutPadding {
    /// No padding.
    None,
    /// Compact padding.
    Sm,
    /// Default padding.
    #[default]
    Md,
    /// Spacious padding.
    Lg,
}

impl LayoutPadding {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Cross-axis alignment tokens.
pub enum LayoutAlign {
    /// Stretch/fill alignment.
    #[default]
    Stretch,
    /// Start alignment.
    Start,
    /// Center alignment.
    Center,
    /// End alignment.
    End,
}

impl LayoutAlign {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Main-axis justification tokens.
pub enum LayoutJustify {
    /// Start justification.
    #[default]
    Start,
    /// Center justification.
    Center,
    /// Space between items.
    Between,
    /// End justification.
    End,
}

impl LayoutJustify {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::Between => "between",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Dialog width tokens.
pub enum ModalSize {
    /// Confirmation-sized dialog.
    Sm,
    /// Default form dialog.
    #[default]
    Md,
    /// Wide form dialog.
    Lg,
    /// Extra wide dialog for two- and three-column forms.
    Xl,
}

impl ModalSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
            Self::Xl => "xl",
        }
    }

    /// Parses a configured size token; unknown tokens fall back to [`ModalSize::Md`].
    pub fn from_token(token: &str) -> Self {
        match token {
            "sm" => Self::Sm,
            "lg" => Self::Lg,
            "xl" => Self::Xl,
            _ => Self::Md,
        }
    }
}

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn call_optional<T: 'static>(callback: Option<&Callback<T>>, value: T) {
    if let Some(callback) = callback {
        callback.call(value);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn configured_colors_map_to_tokens() {
        assert_eq!(ButtonVariant::from_color("danger").token(), "danger");
        assert_eq!(ButtonVariant::from_color("info").token(), "primary");
        assert_eq!(ButtonVariant::from_color("anything").token(), "standard");
        assert_eq!(TextTone::from_color("green").token(), "success");
        assert_eq!(TextTone::from_color("").token(), "primary");
        assert_eq!(ModalSize::from_token("xl").token(), "xl");
        assert_eq!(ModalSize::from_token("huge"), ModalSize::Md);
    }

    #[test]
    fn layout_classes_append_only_when_present() {
        assert_eq!(merge_layout_class("ui-stack", None), "ui-stack");
        assert_eq!(merge_layout_class("ui-stack", Some("")), "ui-stack");
        assert_eq!(
            merge_layout_class("ui-stack", Some("crud-filters")),
            "ui-stack crud-filters"
        );
        assert_eq!(bool_token(true), "true");
    }
}
