use gtk4::prelude::*;

use clear_minutes::processing::{ProcessingMachine, STEPS};

struct StepRow {
    badge: gtk4::Label,
    label: gtk4::Label,
}

/// Handles returned from building the processing page.
pub struct ProcessingWidgets {
    pub page: gtk4::Stack,
    pub try_again_button: gtk4::Button,
    steps: Vec<StepRow>,
    error_page: libadwaita::StatusPage,
}

pub fn build_processing_page() -> ProcessingWidgets {
    let page = gtk4::Stack::new();
    page.set_transition_type(gtk4::StackTransitionType::Crossfade);

    // --- In progress ---
    let progress = gtk4::Box::new(gtk4::Orientation::Vertical, 18);
    progress.set_valign(gtk4::Align::Center);
    progress.set_halign(gtk4::Align::Center);
    progress.set_margin_start(24);
    progress.set_margin_end(24);

    let spinner = gtk4::Spinner::new();
    spinner.set_size_request(48, 48);
    spinner.start();
    progress.append(&spinner);

    let title = gtk4::Label::new(Some("Processing your meeting"));
    title.add_css_class("title-2");
    progress.append(&title);

    let subtitle = gtk4::Label::new(Some("This usually takes under a minute."));
    subtitle.add_css_class("dim-label");
    progress.append(&subtitle);

    let list = gtk4::Box::new(gtk4::Orientation::Vertical, 10);
    list.set_margin_top(12);
    let steps = STEPS
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let row = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
            let badge = gtk4::Label::new(Some(&(i + 1).to_string()));
            badge.add_css_class("step-badge");
            badge.set_valign(gtk4::Align::Center);
            let label = gtk4::Label::new(Some(text));
            label.set_xalign(0.0);
            row.append(&badge);
            row.append(&label);
            list.append(&row);
            StepRow { badge, label }
        })
        .collect();
    progress.append(&list);

    page.add_named(&progress, Some("progress"));

    // --- Failed ---
    let try_again_button = gtk4::Button::with_label("Try Again");
    try_again_button.add_css_class("suggested-action");
    try_again_button.add_css_class("pill");
    try_again_button.set_halign(gtk4::Align::Center);

    let error_page = libadwaita::StatusPage::builder()
        .icon_name("dialog-error-symbolic")
        .title("Processing Failed")
        .child(&try_again_button)
        .vexpand(true)
        .build();
    page.add_named(&error_page, Some("error"));

    page.set_visible_child_name("progress");

    ProcessingWidgets {
        page,
        try_again_button,
        steps,
        error_page,
    }
}

pub fn render(widgets: &ProcessingWidgets, machine: &ProcessingMachine) {
    if let Some(message) = machine.state().error_message() {
        widgets.error_page.set_description(Some(message));
        widgets.page.set_visible_child_name("error");
        return;
    }
    widgets.page.set_visible_child_name("progress");

    let current = machine.step();
    for (i, row) in widgets.steps.iter().enumerate() {
        for class in ["done", "current", "pending"] {
            row.badge.remove_css_class(class);
        }
        row.label.remove_css_class("dim-label");
        row.label.remove_css_class("heading");

        if i < current {
            row.badge.set_text("\u{2713}");
            row.badge.add_css_class("done");
        } else if i == current {
            row.badge.set_text(&(i + 1).to_string());
            row.badge.add_css_class("current");
            row.label.add_css_class("heading");
        } else {
            row.badge.set_text(&(i + 1).to_string());
            row.badge.add_css_class("pending");
            row.label.add_css_class("dim-label");
        }
    }
}
