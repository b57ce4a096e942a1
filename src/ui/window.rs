use gtk4::prelude::*;
use libadwaita::prelude::*;

use super::processing_page::{self, ProcessingWidgets};
use super::results_page::{self, ResultsWidgets};
use super::upload_page::{self, UploadWidgets};

const CSS: &str = r#"
.drop-zone {
    border: 2px dashed alpha(@accent_color, 0.4);
    border-radius: 12px;
    padding: 36px 24px;
}
.drop-zone.dragging {
    border-color: @accent_color;
    background-color: alpha(@accent_color, 0.08);
}
.drop-zone-icon {
    font-size: 42px;
}
.step-badge {
    min-width: 24px;
    min-height: 24px;
    border-radius: 12px;
    font-weight: bold;
    font-size: 12px;
}
.step-badge.done {
    background-color: @success_color;
    color: white;
}
.step-badge.current {
    background-color: @accent_bg_color;
    color: @accent_fg_color;
}
.step-badge.pending {
    background-color: alpha(@view_fg_color, 0.1);
}
.confidence-badge {
    border-radius: 9px;
    padding: 1px 8px;
    font-size: 11px;
}
.confidence-badge.high {
    background-color: alpha(@success_color, 0.2);
}
.confidence-badge.medium {
    background-color: alpha(@warning_color, 0.2);
}
.confidence-badge.low {
    background-color: alpha(@view_fg_color, 0.1);
}
.transcript {
    font-family: monospace;
}
"#;

/// Handles returned from building the main window.
pub struct WindowWidgets {
    pub window: libadwaita::ApplicationWindow,
    pub toast_overlay: libadwaita::ToastOverlay,
    pub stack: gtk4::Stack,
    pub history_button: gtk4::Button,
    pub upload: UploadWidgets,
    pub processing: ProcessingWidgets,
    pub results: ResultsWidgets,
}

/// Build the main window with the upload, processing and results pages.
pub fn build_window(app: &libadwaita::Application) -> WindowWidgets {
    let window = libadwaita::ApplicationWindow::builder()
        .application(app)
        .title("ClearMinutes")
        .default_width(720)
        .default_height(820)
        .build();

    let css_provider = gtk4::CssProvider::new();
    css_provider.load_from_string(CSS);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &css_provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    let toolbar_view = libadwaita::ToolbarView::new();
    let header = libadwaita::HeaderBar::new();

    let history_button = gtk4::Button::from_icon_name("document-open-recent-symbolic");
    history_button.set_tooltip_text(Some("Processed meetings"));
    header.pack_start(&history_button);

    let menu_button = gtk4::MenuButton::new();
    menu_button.set_icon_name("open-menu-symbolic");
    let menu = gtk4::gio::Menu::new();
    menu.append(Some("Job History"), Some("app.history"));
    menu.append(Some("About ClearMinutes"), Some("app.about"));
    menu.append(Some("Quit"), Some("app.quit"));
    menu_button.set_menu_model(Some(&menu));
    header.pack_end(&menu_button);

    toolbar_view.add_top_bar(&header);

    let upload = upload_page::build_upload_page();
    let processing = processing_page::build_processing_page();
    let results = results_page::build_results_page();

    let stack = gtk4::Stack::new();
    stack.set_transition_type(gtk4::StackTransitionType::Crossfade);
    stack.add_named(&scrolled(&upload.page), Some("upload"));
    stack.add_named(&processing.page, Some("processing"));
    stack.add_named(&scrolled(&results.page), Some("results"));
    stack.set_visible_child_name("upload");

    toolbar_view.set_content(Some(&stack));

    let toast_overlay = libadwaita::ToastOverlay::new();
    toast_overlay.set_child(Some(&toolbar_view));
    window.set_content(Some(&toast_overlay));

    WindowWidgets {
        window,
        toast_overlay,
        stack,
        history_button,
        upload,
        processing,
        results,
    }
}

fn scrolled(child: &impl IsA<gtk4::Widget>) -> gtk4::ScrolledWindow {
    let clamp = libadwaita::Clamp::builder()
        .maximum_size(760)
        .child(child)
        .build();
    gtk4::ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .vexpand(true)
        .child(&clamp)
        .build()
}
