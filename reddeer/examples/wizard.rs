use reddeer::wait::ShellIsActive;
use reddeer::{Matcher, RedDeerError, Selector, Session, TextMatcher, WidgetSpec};
use std::time::Duration;

fn main() -> Result<(), RedDeerError> {
    reddeer::logging::init_tracing();

    let (session, display) = Session::in_memory()?;
    session.run_on_ui_thread({
        let display = display.clone();
        move || {
            display.open_shell(WidgetSpec::shell("Workbench").child(
                WidgetSpec::button("&New Project...").on_click(|display, _| {
                    // Dialogs take a moment to come up.
                    display.timer_exec(Duration::from_millis(250), |display| {
                        let dialog = WidgetSpec::shell("New Project").children([
                            WidgetSpec::label("Project &name:"),
                            WidgetSpec::text(""),
                            WidgetSpec::label("&Template:"),
                            WidgetSpec::combo(["Empty", "Library", "Application"]),
                            WidgetSpec::button("&Finish"),
                        ]);
                        if let Err(e) = display.open_shell(dialog) {
                            tracing::error!("Failed to open dialog: {}", e);
                        }
                    });
                }),
            ))
        }
    })?;

    let new_project = session.find(Selector::parse("button|New Project...")?)?;
    session.buttons().click(&new_project)?;
    session.wait_until(ShellIsActive::new(
        session.shells(),
        TextMatcher::equals("New Project"),
    ))?;

    let widgets = session.widgets();
    let name = session.find(Matcher::label("Project name:"))?;
    widgets.set_text(&name, "demo")?;
    let template = session.find(Matcher::label("Template:"))?;
    widgets.select(&template, "Library")?;

    let dialog = session.shells().active_shell()?;
    println!("{}", session.widget_tree(&dialog, 2)?.to_json().unwrap_or_default());

    display.dispose();
    Ok(())
}
