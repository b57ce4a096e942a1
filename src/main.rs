mod app;
mod ui;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::gio;
use gtk4::prelude::*;
use libadwaita::prelude::*;

use app::{AppState, BackendEvent, Route};

fn main() {
    env_logger::init();
    log::info!("ClearMinutes starting");

    let application = libadwaita::Application::builder()
        .application_id("io.github.clearminutes.Client")
        .build();

    application.connect_activate(on_activate);
    application.run();
}

fn on_activate(app: &libadwaita::Application) {
    // Backend -> UI channel
    let (backend_tx, backend_rx) = async_channel::unbounded::<BackendEvent>();
    let state = Rc::new(RefCell::new(AppState::new(backend_tx)));

    let window = ui::window::build_window(app);

    // --- Upload page ---
    {
        let state_clone = state.clone();
        window.upload.submit_button.connect_clicked(move |_| {
            app::upload::submit(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        ui::upload_page::connect_drop(&window.upload, move |path: PathBuf| {
            app::upload::select_file(&state_clone, &path);
        });
    }
    {
        let state_clone = state.clone();
        ui::upload_page::connect_browse(
            &window.upload,
            window.window.upcast_ref(),
            move |path: PathBuf| app::upload::select_file(&state_clone, &path),
        );
    }

    // --- Processing page ---
    {
        let state_clone = state.clone();
        window.processing.try_again_button.connect_clicked(move |_| {
            app::navigate(&state_clone, Route::Upload);
        });
    }

    // --- Results page ---
    {
        let state_clone = state.clone();
        window.results.copy_button.connect_clicked(move |_| {
            app::results::copy_as_text(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        window.results.export_button.connect_clicked(move |_| {
            app::results::export_markdown(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        window.results.retry_button.connect_clicked(move |_| {
            app::results::retry(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        window.results.low_conf_button.connect_clicked(move |_| {
            app::results::toggle_low_confidence(&state_clone);
        });
    }
    {
        let state_clone = state.clone();
        window.results.transcript_button.connect_clicked(move |_| {
            app::results::toggle_transcript(&state_clone);
        });
    }
    for button in [&window.results.another_button, &window.results.error_back_button] {
        let state_clone = state.clone();
        button.connect_clicked(move |_| {
            app::navigate(&state_clone, Route::Upload);
        });
    }

    // --- History ---
    {
        let state_clone = state.clone();
        window.history_button.connect_clicked(move |_| {
            app::history::show(&state_clone);
        });
    }

    // --- App actions ---
    {
        let state_clone = state.clone();
        let history_action = gio::SimpleAction::new("history", None);
        history_action.connect_activate(move |_, _| {
            app::history::show(&state_clone);
        });
        app.add_action(&history_action);
    }
    {
        let parent = window.window.clone();
        let about_action = gio::SimpleAction::new("about", None);
        about_action.connect_activate(move |_, _| {
            let about = libadwaita::AboutWindow::builder()
                .application_name("ClearMinutes")
                .version(env!("CARGO_PKG_VERSION"))
                .comments("Turn meeting recordings into structured minutes.")
                .transient_for(&parent)
                .modal(true)
                .build();
            about.present();
        });
        app.add_action(&about_action);
    }
    {
        let app_clone = app.clone();
        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(move |_, _| {
            app_clone.quit();
        });
        app.add_action(&quit_action);
        app.set_accels_for_action("app.quit", &["<Control>q"]);
    }

    // Store UI handles in state
    let main_window = window.window.clone();
    state.borrow_mut().window = Some(window);

    // Attach backend event handler
    {
        let state_clone = state.clone();
        gtk4::glib::spawn_future_local(async move {
            while let Ok(event) = backend_rx.recv().await {
                app::handle_backend_event(&state_clone, event);
            }
        });
    }

    app::navigate(&state, Route::Upload);
    app::check_health(&state);

    main_window.present();
}
