use std::rc::Rc;

use gtk4::prelude::*;
use libadwaita::prelude::*;

use clear_minutes::history::{JobHistory, JobRecord};

/// What the user asked for on a history row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Open(String),
    Delete(String),
}

/// Handles returned from building the history window.
pub struct HistoryWidgets {
    pub window: libadwaita::Window,
    toast_overlay: libadwaita::ToastOverlay,
    content: gtk4::Box,
    on_action: Rc<dyn Fn(HistoryAction)>,
}

/// Build (but do not present) a window listing processed meetings.
pub fn build_history_window(
    parent: &impl IsA<gtk4::Window>,
    on_action: Rc<dyn Fn(HistoryAction)>,
) -> HistoryWidgets {
    let window = libadwaita::Window::builder()
        .title("Job History")
        .default_width(520)
        .default_height(560)
        .transient_for(parent)
        .modal(true)
        .build();

    let toast_overlay = libadwaita::ToastOverlay::new();

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    let back_btn = gtk4::Button::from_icon_name("go-previous-symbolic");
    back_btn.set_tooltip_text(Some("Back to main"));
    let win_for_back = window.clone();
    back_btn.connect_clicked(move |_| {
        win_for_back.close();
    });
    header.pack_start(&back_btn);

    toolbar_view.add_top_bar(&header);

    let content = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    content.set_margin_start(16);
    content.set_margin_end(16);
    content.set_margin_top(12);
    content.set_margin_bottom(12);

    let scrolled = gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&content)
        .build();
    toolbar_view.set_content(Some(&scrolled));
    toast_overlay.set_child(Some(&toolbar_view));
    window.set_content(Some(&toast_overlay));

    HistoryWidgets {
        window,
        toast_overlay,
        content,
        on_action,
    }
}

/// Rebuild the list from `history`, newest first.
pub fn populate(widgets: &HistoryWidgets, history: &JobHistory) {
    let content = &widgets.content;
    while let Some(child) = content.first_child() {
        content.remove(&child);
    }

    if history.is_empty() {
        let empty_label = gtk4::Label::new(Some("No meetings processed yet."));
        empty_label.add_css_class("dim-label");
        empty_label.set_vexpand(true);
        empty_label.set_valign(gtk4::Align::Center);
        content.append(&empty_label);
        return;
    }

    let group = libadwaita::PreferencesGroup::new();
    group.set_title("Processed Meetings");
    for record in history.newest_first() {
        group.add(&build_job_row(record, &widgets.on_action));
    }
    content.append(&group);
}

pub fn toast(widgets: &HistoryWidgets, message: &str) {
    let toast = libadwaita::Toast::new(message);
    toast.set_timeout(2);
    widgets.toast_overlay.add_toast(toast);
}

fn build_job_row(record: &JobRecord, on_action: &Rc<dyn Fn(HistoryAction)>) -> libadwaita::ActionRow {
    let row = libadwaita::ActionRow::builder()
        .use_markup(false)
        .title(record.filename.as_str())
        .subtitle(record.completed_at.as_str())
        .activatable(true)
        .build();
    row.set_tooltip_text(Some(&record.job_id));

    let delete_btn = gtk4::Button::from_icon_name("user-trash-symbolic");
    delete_btn.set_valign(gtk4::Align::Center);
    delete_btn.set_tooltip_text(Some("Delete from server"));
    delete_btn.add_css_class("flat");
    let job_id = record.job_id.clone();
    let action = on_action.clone();
    delete_btn.connect_clicked(move |btn| {
        btn.set_sensitive(false);
        action(HistoryAction::Delete(job_id.clone()));
    });
    row.add_suffix(&delete_btn);

    let open_icon = gtk4::Image::from_icon_name("go-next-symbolic");
    row.add_suffix(&open_icon);

    let job_id = record.job_id.clone();
    let action = on_action.clone();
    row.connect_activated(move |_| {
        action(HistoryAction::Open(job_id.clone()));
    });

    row
}
