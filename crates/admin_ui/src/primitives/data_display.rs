use super::*;

#[component]
/// Generic surface primitive.
pub fn Surface(
    #[prop(default = SurfaceVariant::Standard)] variant: SurfaceVariant,
    #[prop(default = Elevation::Flat)] elevation: Elevation,
    #[prop(default = LayoutPadding::Md)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] role: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-surface", layout_class)
            data-ui-primitive="true"
            data-ui-kind="surface"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-elevation=elevation.token()
            data-ui-padding=padding.token()
            role=role
            aria-label=aria_label
        >
            {children()}
        </div>
    }
}

#[component]
/// Page-level panel with an optional header row (title plus trailing actions).
pub fn Panel(
    #[prop(default = Elevation::Raised)] elevation: Elevation,
    #[prop(default = LayoutPadding::Md)] padding: LayoutPadding,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional)] actions: Option<Children>,
    children: Children,
) -> impl IntoView {
    let has_header = title.is_some() || actions.is_some();
    view! {
        <section
            class=merge_layout_class("ui-panel", layout_class)
            data-ui-primitive="true"
            data-ui-kind="panel"
            data-ui-elevation=elevation.token()
            data-ui-padding=padding.token()
        >
            {has_header.then(|| view! {
                <header data-ui-slot="header">
                    {title.map(|title| view! { <h2 data-ui-slot="title">{title}</h2> })}
                    {actions.map(|actions| view! { <div data-ui-slot="actions">{actions()}</div> })}
                </header>
            })}
            <div data-ui-slot="body">{children()}</div>
        </section>
    }
}

#[component]
/// Inline text primitive.
pub fn Text(
    #[prop(default = TextRole::Body)] role: TextRole,
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-text", layout_class)
            data-ui-primitive="true"
            data-ui-kind="text"
            data-ui-slot=ui_slot
            data-ui-variant=role.token()
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Heading primitive.
pub fn Heading(
    #[prop(default = TextRole::Title)] role: TextRole,
    #[prop(default = TextTone::Primary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <h1
            class=merge_layout_class("ui-heading", layout_class)
            data-ui-primitive="true"
            data-ui-kind="heading"
            data-ui-variant=role.token()
            data-ui-tone=tone.token()
        >
            {children()}
        </h1>
    }
}

#[component]
/// Compact status badge.
pub fn Badge(
    #[prop(default = TextTone::Secondary)] tone: TextTone,
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-badge", layout_class)
            data-ui-primitive="true"
            data-ui-kind="badge"
            data-ui-tone=tone.token()
        >
            {children()}
        </span>
    }
}

#[component]
/// Empty state content block.
pub fn EmptyState(
    #[prop(optional)] layout_class: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-empty-state", layout_class)
            data-ui-primitive="true"
            data-ui-kind="empty-state"
        >
            {children()}
        </div>
    }
}

#[component]
/// Busy indicator.
pub fn Spinner(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    view! {
        <span
            class="ui-spinner"
            role="status"
            aria-label=label
            data-ui-primitive="true"
            data-ui-kind="spinner"
        ></span>
    }
}

#[component]
/// Table primitive; `busy` dims the body while a reload is in flight.
pub fn DataTable(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] busy: MaybeSignal<bool>,
    children: Children,
) -> impl IntoView {
    view! {
        <div class="ui-data-table-scroll" data-ui-slot="scroll">
            <table
                class=merge_layout_class("ui-data-table", layout_class)
                aria-label=aria_label
                aria-busy=move || bool_token(busy.get())
                data-ui-primitive="true"
                data-ui-kind="data-table"
                data-ui-state=move || if busy.get() { "busy" } else { "idle" }
            >
                {children()}
            </table>
        </div>
    }
}

#[component]
/// Table row.
pub fn TableRow(
    #[prop(optional, into)] row_key: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <tr data-ui-primitive="true" data-ui-kind="table-row" data-row-key=row_key>
            {children()}
        </tr>
    }
}

#[component]
/// Table cell; `colspan` is used by the empty-list row.
pub fn TableCell(
    #[prop(optional)] colspan: Option<usize>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    view! {
        <td
            colspan=colspan
            data-ui-primitive="true"
            data-ui-kind="table-cell"
            data-ui-slot=ui_slot
        >
            {children()}
        </td>
    }
}

#[component]
/// Column header; sortable headers render as buttons with an indicator icon.
///
/// `indicator` is `None` when no direction applies; headers without `on_sort` render as text.
pub fn SortHeader(
    #[prop(into)] label: String,
    #[prop(optional, into)] indicator: MaybeSignal<Option<IconName>>,
    #[prop(optional)] on_sort: Option<Callback<()>>,
) -> impl IntoView {
    let indicator = Signal::derive(move || indicator.get());
    let aria_sort = move || match indicator.get() {
        Some(IconName::SortUp) => "ascending",
        Some(IconName::SortDown) => "descending",
        _ => "none",
    };
    let content = match on_sort {
        Some(on_sort) => view! {
            <button type="button" data-ui-slot="sort-trigger" on:click=move |_| on_sort.call(())>
                <span>{label}</span>
                {move || indicator.get().map(|icon| view! { <Icon icon size=IconSize::Xs /> })}
            </button>
        }
        .into_view(),
        None => label.into_view(),
    };

    view! {
        <th
            scope="col"
            aria-sort=aria_sort
            data-ui-primitive="true"
            data-ui-kind="sort-header"
        >
            {content}
        </th>
    }
}
