use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One entry in a pagination strip.
pub enum PageSlot {
    /// Link to a page number.
    Page(u32),
    /// Elided run of pages.
    Gap,
}

/// Page numbers to show around `current`: always the first and last page, `span` pages either side
/// of the current one, and a [`PageSlot::Gap`] wherever numbers are skipped.
pub fn page_window(current: u32, last: u32, span: u32) -> Vec<PageSlot> {
    let last = last.max(1);
    let current = current.clamp(1, last);
    let start = current.saturating_sub(span).max(1);
    let end = current.saturating_add(span).min(last);

    let mut slots = Vec::new();
    if start > 1 {
        slots.push(PageSlot::Page(1));
        if start > 2 {
            slots.push(PageSlot::Gap);
        }
    }
    slots.extend((start..=end).map(PageSlot::Page));
    if end < last {
        if end + 1 < last {
            slots.push(PageSlot::Gap);
        }
        slots.push(PageSlot::Page(last));
    }
    slots
}

#[component]
/// Horizontal toolbar row.
pub fn ToolBar(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: Option<String>,
    children: Children,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-toolbar", layout_class)
            role="toolbar"
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="toolbar"
        >
            {children()}
        </div>
    }
}

#[component]
/// Pagination strip with previous/next, numbered pages, and a page-size selector.
pub fn Pagination(
    #[prop(into)] current: Signal<u32>,
    #[prop(into)] last_page: Signal<u32>,
    #[prop(optional, into)] summary: MaybeSignal<String>,
    #[prop(optional, into)] per_page: MaybeSignal<u32>,
    #[prop(optional)] per_page_options: Vec<u32>,
    #[prop(default = 2)] span: u32,
    on_page: Callback<u32>,
    #[prop(optional)] on_per_page: Option<Callback<u32>>,
) -> impl IntoView {
    let slots = move || page_window(current.get(), last_page.get(), span);
    let size_options = per_page_options
        .iter()
        .map(|size| SelectOptionItem::new(size.to_string(), size.to_string()))
        .collect::<Vec<_>>();
    let show_sizes = !size_options.is_empty() && on_per_page.is_some();

    view! {
        <nav
            class="ui-pagination"
            aria-label="Pagination"
            data-ui-primitive="true"
            data-ui-kind="pagination"
        >
            <span data-ui-slot="summary">{move || summary.get()}</span>
            <div data-ui-slot="pages">
                <IconButton
                    icon=IconName::ChevronLeft
                    aria_label="Previous page"
                    disabled=Signal::derive(move || current.get() <= 1)
                    on_click=Callback::new(move |_| on_page.call(current.get_untracked().saturating_sub(1).max(1)))
                />
                {move || {
                    slots()
                        .into_iter()
                        .map(|slot| match slot {
                            PageSlot::Page(page) => view! {
                                <button
                                    type="button"
                                    class="ui-page-link"
                                    aria-current=move || (current.get() == page).then_some("page")
                                    data-ui-selected=move || bool_token(current.get() == page)
                                    on:click=move |_| on_page.call(page)
                                >
                                    {page}
                                </button>
                            }
                            .into_view(),
                            PageSlot::Gap => view! { <span data-ui-slot="gap">"…"</span> }.into_view(),
                        })
                        .collect_view()
                }}
                <IconButton
                    icon=IconName::ChevronRight
                    aria_label="Next page"
                    disabled=Signal::derive(move || current.get() >= last_page.get())
                    on_click=Callback::new(move |_| {
                        let next = current.get_untracked().saturating_add(1);
                        on_page.call(next.min(last_page.get_untracked().max(1)));
                    })
                />
            </div>
            {show_sizes.then(|| view! {
                <SelectField
                    layout_class="ui-page-size"
                    aria_label="Rows per page"
                    variant=FieldVariant::Inset
                    options=size_options
                    value=Signal::derive(move || per_page.get().to_string())
                    on_change=Callback::new(move |raw: String| {
                        if let (Ok(size), Some(on_per_page)) = (raw.parse::<u32>(), on_per_page.as_ref()) {
                            on_per_page.call(size);
                        }
                    })
                />
            })}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::PageSlot::{Gap, Page};
    use super::*;

    #[test]
    fn short_ranges_list_every_page() {
        assert_eq!(page_window(1, 1, 2), vec![Page(1)]);
        assert_eq!(page_window(2, 4, 2), vec![Page(1), Page(2), Page(3), Page(4)]);
    }

    #[test]
    fn long_ranges_elide_the_middle() {
        assert_eq!(
            page_window(10, 20, 2),
            vec![Page(1), Gap, Page(8), Page(9), Page(10), Page(11), Page(12), Gap, Page(20)]
        );
        assert_eq!(page_window(1, 20, 1), vec![Page(1), Page(2), Gap, Page(20)]);
        assert_eq!(page_window(4, 5, 1), vec![Page(1), Gap, Page(3), Page(4), Page(5)]);
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        assert_eq!(page_window(0, 0, 2), vec![Page(1)]);
        assert_eq!(page_window(9, 3, 1), vec![Page(1), Page(2), Page(3)]);
    }
}
