//! Shared UI primitive library for the admin CRUD screens.
//!
//! The crate owns reusable Leptos primitives, a centralized icon API, and the stable `data-ui-*`
//! DOM contract consumed by the admin stylesheet. Screens compose these primitives instead of
//! emitting ad hoc control markup.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod icon;
mod primitives;

pub use icon::{Icon, IconName, IconSize};
pub use primitives::{
    page_window, Badge, Button, ButtonSize, ButtonVariant, CheckboxField, Cluster, ColorField,
    ComboField, DataTable, Elevation, EmptyState, FieldGroup, FieldVariant, FileField, Grid,
    Heading, IconButton, LayoutAlign, LayoutGap, LayoutJustify, LayoutPadding, Modal, ModalSize,
    PageSlot, Pagination, Panel, RadioGroup, SearchField, SelectField, SelectOptionItem,
    SortHeader, Spinner, Stack, Surface, SurfaceVariant, Switch, TableCell, TableRow, Text,
    TextArea, TextField, TextRole, TextTone, ToastItem, ToastRegion, ToolBar,
};

/// Convenience imports for crates composing admin screens.
pub mod prelude {
    pub use crate::{
        Badge, Button, ButtonSize, ButtonVariant, CheckboxField, Cluster, ColorField, ComboField,
        DataTable, Elevation, EmptyState, FieldGroup, FieldVariant, FileField, Grid, Heading,
        Icon, IconButton, IconName, IconSize, LayoutAlign, LayoutGap, LayoutJustify,
        LayoutPadding, Modal, ModalSize, Pagination, Panel, RadioGroup, SearchField, SelectField,
        SelectOptionItem, SortHeader, Spinner, Stack, Surface, SurfaceVariant, Switch, TableCell,
        TableRow, Text, TextArea, TextField, TextRole, TextTone, ToastItem, ToastRegion, ToolBar,
    };
}
