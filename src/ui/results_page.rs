use gtk4::prelude::*;

use clear_minutes::minutes::{ResultsView, NONE_RECORDED, NO_ACTION_ITEMS};
use clear_minutes::ActionItem;

/// Handles returned from building the results page.
pub struct ResultsWidgets {
    pub page: gtk4::Stack,
    pub filename_label: gtk4::Label,
    pub copy_button: gtk4::Button,
    pub export_button: gtk4::Button,
    pub another_button: gtk4::Button,
    pub retry_button: gtk4::Button,
    pub error_back_button: gtk4::Button,
    pub low_conf_button: gtk4::Button,
    pub transcript_button: gtk4::Button,
    error_page: libadwaita::StatusPage,
    overview_label: gtk4::Label,
    key_points_box: gtk4::Box,
    decisions_box: gtk4::Box,
    questions_box: gtk4::Box,
    action_items_box: gtk4::ListBox,
    transcript_revealer: gtk4::Revealer,
    transcript_label: gtk4::Label,
}

pub fn build_results_page() -> ResultsWidgets {
    let page = gtk4::Stack::new();
    page.set_transition_type(gtk4::StackTransitionType::Crossfade);

    // --- Loading ---
    let loading = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
    loading.set_valign(gtk4::Align::Center);
    loading.set_margin_top(96);
    let spinner = gtk4::Spinner::new();
    spinner.set_size_request(32, 32);
    spinner.start();
    loading.append(&spinner);
    let loading_label = gtk4::Label::new(Some("Loading minutes\u{2026}"));
    loading_label.add_css_class("dim-label");
    loading.append(&loading_label);
    page.add_named(&loading, Some("loading"));

    // --- Error ---
    let retry_button = gtk4::Button::with_label("Retry");
    retry_button.add_css_class("suggested-action");
    retry_button.add_css_class("pill");
    let error_back_button = gtk4::Button::with_label("Upload Another Meeting");
    error_back_button.add_css_class("pill");
    let error_buttons = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
    error_buttons.set_halign(gtk4::Align::Center);
    error_buttons.append(&retry_button);
    error_buttons.append(&error_back_button);

    let error_page = libadwaita::StatusPage::builder()
        .icon_name("dialog-error-symbolic")
        .title("Could Not Load Minutes")
        .child(&error_buttons)
        .build();
    page.add_named(&error_page, Some("error"));

    // --- Loaded ---
    let loaded = gtk4::Box::new(gtk4::Orientation::Vertical, 18);
    loaded.set_margin_start(24);
    loaded.set_margin_end(24);
    loaded.set_margin_top(24);
    loaded.set_margin_bottom(24);

    let header = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    let caption = gtk4::Label::new(Some("Meeting Minutes"));
    caption.add_css_class("caption-heading");
    caption.add_css_class("dim-label");
    caption.set_xalign(0.0);
    header.append(&caption);

    let filename_label = gtk4::Label::new(None);
    filename_label.add_css_class("title-2");
    filename_label.set_xalign(0.0);
    filename_label.set_wrap(true);
    filename_label.set_selectable(true);
    header.append(&filename_label);

    let buttons = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let copy_button = gtk4::Button::with_label(clear_minutes::minutes::COPY_LABEL);
    copy_button.add_css_class("suggested-action");
    let export_button = gtk4::Button::with_label("Export Markdown");
    let another_button = gtk4::Button::with_label("Upload Another");
    another_button.add_css_class("flat");
    buttons.append(&copy_button);
    buttons.append(&export_button);
    buttons.append(&another_button);
    header.append(&buttons);
    loaded.append(&header);

    let overview_label = gtk4::Label::new(None);
    overview_label.set_wrap(true);
    overview_label.set_xalign(0.0);
    overview_label.set_selectable(true);
    loaded.append(&section("Overview", None, &overview_label));

    let key_points_box = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    loaded.append(&section("Key Points", None, &key_points_box));

    let decisions_box = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    loaded.append(&section("Decisions", None, &decisions_box));

    let questions_box = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    loaded.append(&section("Open Questions", None, &questions_box));

    let low_conf_button = gtk4::Button::new();
    low_conf_button.add_css_class("flat");
    low_conf_button.add_css_class("caption");
    let action_items_box = gtk4::ListBox::new();
    action_items_box.set_selection_mode(gtk4::SelectionMode::None);
    action_items_box.add_css_class("boxed-list");
    loaded.append(&section("Action Items", Some(&low_conf_button), &action_items_box));

    let transcript_button = gtk4::Button::new();
    transcript_button.add_css_class("flat");
    transcript_button.add_css_class("caption");
    let transcript_label = gtk4::Label::new(None);
    transcript_label.add_css_class("transcript");
    transcript_label.set_wrap(true);
    transcript_label.set_xalign(0.0);
    transcript_label.set_selectable(true);
    let transcript_revealer = gtk4::Revealer::builder()
        .transition_type(gtk4::RevealerTransitionType::SlideDown)
        .child(&transcript_label)
        .build();
    loaded.append(&section(
        "Full Transcript",
        Some(&transcript_button),
        &transcript_revealer,
    ));

    page.add_named(&loaded, Some("loaded"));
    page.set_visible_child_name("loading");

    ResultsWidgets {
        page,
        filename_label,
        copy_button,
        export_button,
        another_button,
        retry_button,
        error_back_button,
        low_conf_button,
        transcript_button,
        error_page,
        overview_label,
        key_points_box,
        decisions_box,
        questions_box,
        action_items_box,
        transcript_revealer,
        transcript_label,
    }
}

/// Heading (with an optional trailing control) above `content`.
fn section(
    title: &str,
    control: Option<&gtk4::Button>,
    content: &impl IsA<gtk4::Widget>,
) -> gtk4::Box {
    let section = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    let heading_row = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let heading = gtk4::Label::new(Some(title));
    heading.add_css_class("heading");
    heading.set_xalign(0.0);
    heading.set_hexpand(true);
    heading_row.append(&heading);
    if let Some(control) = control {
        heading_row.append(control);
    }
    section.append(&heading_row);
    section.append(content);
    section
}

pub fn show_loading(widgets: &ResultsWidgets) {
    widgets.page.set_visible_child_name("loading");
}

pub fn show_error(widgets: &ResultsWidgets, message: &str) {
    widgets.error_page.set_description(Some(message));
    widgets.page.set_visible_child_name("error");
}

pub fn show_minutes(widgets: &ResultsWidgets, view: &ResultsView) {
    let Some(minutes) = view.minutes() else {
        return;
    };
    let result = &minutes.result;

    widgets.filename_label.set_text(&minutes.filename);
    widgets.copy_button.set_label(view.copy_label());
    widgets.overview_label.set_text(&result.overview);

    fill_list(&widgets.key_points_box, "\u{2022}", &result.key_points);
    fill_list(&widgets.decisions_box, "\u{2713}", &result.decisions);
    fill_list(&widgets.questions_box, "?", &result.open_questions);

    render_action_items(widgets, view);
    render_transcript(widgets, view);

    widgets.page.set_visible_child_name("loaded");
}

/// Rebuild the action item list and the low-confidence toggle.
pub fn render_action_items(widgets: &ResultsWidgets, view: &ResultsView) {
    let list = &widgets.action_items_box;
    list.remove_all();

    if !view.has_action_items() {
        let empty = gtk4::Label::new(Some(NO_ACTION_ITEMS));
        empty.add_css_class("dim-label");
        empty.set_margin_top(12);
        empty.set_margin_bottom(12);
        list.append(&empty);
    }
    for item in view.visible_action_items() {
        list.append(&action_item_row(item));
    }

    match view.low_confidence_toggle_label() {
        Some(label) => {
            widgets.low_conf_button.set_label(label);
            widgets.low_conf_button.set_visible(true);
        }
        None => widgets.low_conf_button.set_visible(false),
    }
}

pub fn render_transcript(widgets: &ResultsWidgets, view: &ResultsView) {
    let transcript = view
        .minutes()
        .map(|m| m.result.transcript.as_str())
        .unwrap_or("");
    widgets.transcript_label.set_text(transcript);
    widgets.transcript_button.set_label(view.transcript_toggle_label());
    widgets
        .transcript_revealer
        .set_reveal_child(view.transcript_open());
}

fn action_item_row(item: &ActionItem) -> gtk4::Box {
    let row = gtk4::Box::new(gtk4::Orientation::Vertical, 4);
    row.set_margin_start(12);
    row.set_margin_end(12);
    row.set_margin_top(10);
    row.set_margin_bottom(10);
    if item.is_low_confidence() {
        row.set_opacity(0.6);
    }

    let top = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    let task = gtk4::Label::new(Some(&item.task));
    task.set_wrap(true);
    task.set_xalign(0.0);
    task.set_hexpand(true);
    top.append(&task);

    let badge = gtk4::Label::new(Some(item.confidence.as_str()));
    badge.add_css_class("confidence-badge");
    badge.add_css_class(item.confidence.as_str());
    badge.set_valign(gtk4::Align::Start);
    top.append(&badge);
    row.append(&top);

    let mut meta = Vec::new();
    if let Some(assignee) = item.assignee() {
        meta.push(format!("\u{1F464} {assignee}"));
    }
    if let Some(deadline) = item.deadline() {
        meta.push(format!("\u{1F4C5} {deadline}"));
    }
    if !meta.is_empty() {
        let meta_label = gtk4::Label::new(Some(&meta.join("   ")));
        meta_label.add_css_class("caption");
        meta_label.add_css_class("dim-label");
        meta_label.set_xalign(0.0);
        row.append(&meta_label);
    }

    if let Some(evidence) = item.evidence() {
        let evidence_label = gtk4::Label::new(Some(&format!("\u{201C}{evidence}\u{201D}")));
        evidence_label.add_css_class("caption");
        evidence_label.add_css_class("dim-label");
        evidence_label.set_wrap(true);
        evidence_label.set_xalign(0.0);
        row.append(&evidence_label);
    }

    row
}

fn fill_list(container: &gtk4::Box, marker: &str, items: &[String]) {
    while let Some(child) = container.first_child() {
        container.remove(&child);
    }

    if items.is_empty() {
        let empty = gtk4::Label::new(Some(NONE_RECORDED));
        empty.add_css_class("dim-label");
        empty.set_xalign(0.0);
        container.append(&empty);
        return;
    }

    for item in items {
        let line = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
        let bullet = gtk4::Label::new(Some(marker));
        bullet.add_css_class("accent");
        bullet.set_valign(gtk4::Align::Start);
        let text = gtk4::Label::new(Some(item));
        text.set_wrap(true);
        text.set_xalign(0.0);
        text.set_hexpand(true);
        text.set_selectable(true);
        line.append(&bullet);
        line.append(&text);
        container.append(&line);
    }
}
