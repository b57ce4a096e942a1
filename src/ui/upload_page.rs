use std::path::PathBuf;

use gtk4::prelude::*;
use gtk4::{gdk, gio};

use clear_minutes::upload::UploadForm;
use clear_minutes::validation::{ACCEPTED_EXTENSIONS, MAX_UPLOAD_MB};

/// Handles returned from building the upload page.
pub struct UploadWidgets {
    pub page: gtk4::Box,
    pub drop_zone: gtk4::Box,
    pub hint_label: gtk4::Label,
    pub file_label: gtk4::Label,
    pub size_label: gtk4::Label,
    pub error_label: gtk4::Label,
    pub submit_button: gtk4::Button,
    pub progress_bar: gtk4::ProgressBar,
    pub server_label: gtk4::Label,
}

pub fn build_upload_page() -> UploadWidgets {
    let page = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
    page.set_margin_start(24);
    page.set_margin_end(24);
    page.set_margin_top(36);
    page.set_margin_bottom(24);

    let title = gtk4::Label::new(Some("AI Meeting Minutes"));
    title.add_css_class("title-1");
    page.append(&title);

    let subtitle = gtk4::Label::new(Some(
        "Upload a meeting recording and get structured minutes in seconds.",
    ));
    subtitle.add_css_class("dim-label");
    subtitle.set_wrap(true);
    subtitle.set_justify(gtk4::Justification::Center);
    page.append(&subtitle);

    // --- Drop zone ---
    let drop_zone = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    drop_zone.add_css_class("drop-zone");
    drop_zone.set_margin_top(24);
    drop_zone.set_cursor_from_name(Some("pointer"));

    let icon = gtk4::Label::new(Some("\u{1F399}\u{FE0F}"));
    icon.add_css_class("drop-zone-icon");
    drop_zone.append(&icon);

    let hint_label = gtk4::Label::new(Some("Drag & drop your audio file here"));
    hint_label.add_css_class("heading");
    drop_zone.append(&hint_label);

    let file_label = gtk4::Label::new(None);
    file_label.add_css_class("accent");
    file_label.add_css_class("title-4");
    file_label.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);
    file_label.set_visible(false);
    drop_zone.append(&file_label);

    let size_label = gtk4::Label::new(Some(&browse_hint()));
    size_label.add_css_class("dim-label");
    size_label.add_css_class("caption");
    drop_zone.append(&size_label);

    page.append(&drop_zone);

    // --- Error ---
    let error_label = gtk4::Label::new(None);
    error_label.add_css_class("error");
    error_label.set_wrap(true);
    error_label.set_xalign(0.0);
    error_label.set_selectable(true);
    error_label.set_visible(false);
    page.append(&error_label);

    // --- Submit ---
    let submit_button = gtk4::Button::builder()
        .label("Generate Meeting Minutes")
        .sensitive(false)
        .margin_top(12)
        .build();
    submit_button.add_css_class("suggested-action");
    submit_button.add_css_class("pill");
    page.append(&submit_button);

    let progress_bar = gtk4::ProgressBar::new();
    progress_bar.set_show_text(true);
    progress_bar.set_visible(false);
    page.append(&progress_bar);

    let server_label = gtk4::Label::new(Some("Checking server\u{2026}"));
    server_label.add_css_class("dim-label");
    server_label.add_css_class("caption");
    server_label.set_margin_top(12);
    page.append(&server_label);

    UploadWidgets {
        page,
        drop_zone,
        hint_label,
        file_label,
        size_label,
        error_label,
        submit_button,
        progress_bar,
        server_label,
    }
}

/// Call `on_file` with the first local file dropped on the zone.
pub fn connect_drop<F>(widgets: &UploadWidgets, on_file: F)
where
    F: Fn(PathBuf) + 'static,
{
    let target = gtk4::DropTarget::new(gdk::FileList::static_type(), gdk::DragAction::COPY);

    let zone = widgets.drop_zone.clone();
    target.connect_enter(move |_, _, _| {
        zone.add_css_class("dragging");
        gdk::DragAction::COPY
    });
    let zone = widgets.drop_zone.clone();
    target.connect_leave(move |_| {
        zone.remove_css_class("dragging");
    });

    let zone = widgets.drop_zone.clone();
    target.connect_drop(move |_, value, _, _| {
        zone.remove_css_class("dragging");
        let Ok(list) = value.get::<gdk::FileList>() else {
            return false;
        };
        match list.files().first().and_then(|f| f.path()) {
            Some(path) => {
                on_file(path);
                true
            }
            None => {
                log::warn!("Dropped item is not a local file");
                false
            }
        }
    });

    widgets.drop_zone.add_controller(target);
}

/// Open a file picker limited to supported recordings when the zone is clicked.
pub fn connect_browse<F>(widgets: &UploadWidgets, parent: &gtk4::Window, on_file: F)
where
    F: Fn(PathBuf) + Clone + 'static,
{
    let click = gtk4::GestureClick::new();
    let parent = parent.clone();
    click.connect_released(move |_, _, _, _| {
        choose_file(&parent, on_file.clone());
    });
    widgets.drop_zone.add_controller(click);
}

fn choose_file<F>(parent: &gtk4::Window, on_file: F)
where
    F: Fn(PathBuf) + 'static,
{
    let filter = gtk4::FileFilter::new();
    filter.set_name(Some("Audio recordings"));
    for ext in ACCEPTED_EXTENSIONS {
        filter.add_suffix(ext);
    }
    let filters = gio::ListStore::new::<gtk4::FileFilter>();
    filters.append(&filter);

    let dialog = gtk4::FileDialog::builder()
        .title("Select a meeting recording")
        .modal(true)
        .filters(&filters)
        .default_filter(&filter)
        .build();

    dialog.open(Some(parent), None::<&gio::Cancellable>, move |result| match result {
        Ok(file) => match file.path() {
            Some(path) => on_file(path),
            None => log::warn!("Selected file has no local path"),
        },
        Err(e) if e.matches(gtk4::DialogError::Dismissed) => {}
        Err(e) => log::error!("File dialog failed: {e}"),
    });
}

/// Reflect the form in the widgets.
pub fn render(widgets: &UploadWidgets, form: &UploadForm, server_online: Option<bool>, base_url: &str) {
    match form.candidate() {
        Some(candidate) => {
            widgets.hint_label.set_visible(false);
            widgets.file_label.set_text(&candidate.name);
            widgets.file_label.set_visible(true);
            widgets.size_label.set_text(&candidate.size_label());
        }
        None => {
            widgets.hint_label.set_visible(true);
            widgets.file_label.set_visible(false);
            widgets.size_label.set_text(&browse_hint());
        }
    }

    match form.error() {
        Some(error) => {
            widgets.error_label.set_text(error);
            widgets.error_label.set_visible(true);
        }
        None => widgets.error_label.set_visible(false),
    }

    widgets.submit_button.set_label(form.submit_label());
    widgets.submit_button.set_sensitive(form.can_submit());
    widgets.drop_zone.set_sensitive(!form.in_flight());

    widgets.progress_bar.set_visible(form.in_flight());
    match form.progress_fraction() {
        Some(fraction) => {
            widgets.progress_bar.set_fraction(fraction);
            widgets
                .progress_bar
                .set_text(Some(&format!("Uploading\u{2026} {:.0}%", fraction * 100.0)));
        }
        None => {
            widgets.progress_bar.set_fraction(0.0);
            widgets.progress_bar.set_text(Some("Uploading\u{2026}"));
        }
    }

    let server_text = match server_online {
        None => "Checking server\u{2026}".to_string(),
        Some(true) => "Server online".to_string(),
        Some(false) => format!("Server unreachable ({base_url})"),
    };
    widgets.server_label.set_text(&server_text);
}

fn browse_hint() -> String {
    let formats: Vec<String> = ACCEPTED_EXTENSIONS.iter().map(|e| e.to_uppercase()).collect();
    format!("or click to browse: {} up to {MAX_UPLOAD_MB}MB", formats.join(", "))
}
