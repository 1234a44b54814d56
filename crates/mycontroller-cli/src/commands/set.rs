//! Set command implementation.
//!
//! Every target follows the same cycle as the settings screens: load the
//! group, enter edit mode, change the requested fields, save.

use anyhow::{Result, bail};
use mycontroller_core::{
    DialogOutcome, DialogSize, MetricsSettingsController, MySensorsSettingsController,
    NotificationSettingsController, SaveOutcome, SettingsPanel, SystemSettingsController,
    UnitsSettingsController,
};
use mycontroller_types::{GroupKind, RetentionDuration, RetentionWindow, SettingsGroup, TypeOption};

use crate::cli::SetTarget;
use crate::commands::CommandContext;
use crate::style::format_warning;

pub async fn cmd_set(ctx: &CommandContext, target: SetTarget) -> Result<()> {
    match target {
        SetTarget::Location {
            latitude,
            longitude,
            locate,
        } => set_location(ctx, latitude, longitude, locate).await,
        SetTarget::Controller {
            alive_check_minutes,
            page_refresh_seconds,
            language,
            log_level,
        } => {
            set_controller(
                ctx,
                alive_check_minutes,
                page_refresh_seconds,
                language,
                log_level,
            )
            .await
        }
        SetTarget::Unit { variable, unit } => {
            let mut controller = UnitsSettingsController::new(ctx.services.clone());
            controller.activate().await;
            edit(&mut controller.units)?.set_unit(&variable, &unit);
            check(controller.save_units().await, controller.units.kind())
        }
        SetTarget::Email {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            enable_ssl,
            from_address,
        } => {
            let mut controller = NotificationSettingsController::new(ctx.services.clone());
            controller.activate().await;
            let email = edit(&mut controller.email)?;
            replace(&mut email.smtp_host, smtp_host);
            if smtp_port.is_some() {
                email.smtp_port = smtp_port;
            }
            replace(&mut email.smtp_username, smtp_username);
            replace(&mut email.smtp_password, smtp_password);
            if let Some(enable_ssl) = enable_ssl {
                email.enable_ssl = enable_ssl;
            }
            replace(&mut email.from_address, from_address);
            check(controller.save_email().await, controller.email.kind())
        }
        SetTarget::Sms {
            vendor,
            auth_sid,
            auth_token,
            phone_number,
        } => {
            let mut controller = NotificationSettingsController::new(ctx.services.clone());
            controller.activate().await;
            let sms = edit(&mut controller.sms)?;
            replace(&mut sms.vendor, vendor);
            replace(&mut sms.auth_sid, auth_sid);
            replace(&mut sms.auth_token, auth_token);
            replace(&mut sms.phone_number, phone_number);
            check(controller.save_sms().await, controller.sms.kind())
        }
        SetTarget::Pushbullet {
            access_token,
            active,
        } => {
            let mut controller = NotificationSettingsController::new(ctx.services.clone());
            controller.activate().await;
            let pushbullet = edit(&mut controller.pushbullet)?;
            replace(&mut pushbullet.access_token, access_token);
            if let Some(active) = active {
                pushbullet.active = active;
            }
            check(controller.save_pushbullet().await, controller.pushbullet.kind())
        }
        SetTarget::Mysensors { default_firmware } => {
            let mut controller = MySensorsSettingsController::new(ctx.services.clone());
            controller.activate().await;
            validate_choice("firmware", &default_firmware, &controller.firmwares)?;
            edit(&mut controller.mysensors)?.default_firmware = Some(default_firmware);
            check(controller.save_mysensors().await, controller.mysensors.kind())?;
            if let Some(name) = &controller.default_firmware_name {
                println!("Default firmware: {}", name);
            }
            Ok(())
        }
        SetTarget::Metrics { default_time_range } => {
            let mut controller = MetricsSettingsController::new(ctx.services.clone());
            controller.activate().await;
            let millis = default_time_range.to_millis()?;
            edit(&mut controller.metrics)?.default_time_range = millis;
            check(controller.save_metrics().await, controller.metrics.kind())
        }
        SetTarget::Retention {
            raw_data,
            one_minute,
            five_minutes,
            one_hour,
            six_hours,
            twelve_hours,
            one_day,
        } => {
            let changes = [
                (RetentionWindow::RawData, raw_data),
                (RetentionWindow::OneMinute, one_minute),
                (RetentionWindow::FiveMinutes, five_minutes),
                (RetentionWindow::OneHour, one_hour),
                (RetentionWindow::SixHours, six_hours),
                (RetentionWindow::TwelveHours, twelve_hours),
                (RetentionWindow::OneDay, one_day),
            ];
            set_retention(ctx, &changes).await
        }
    }
}

/// Put a loaded panel in edit mode and hand out its local copy.
fn edit<G: SettingsGroup>(panel: &mut SettingsPanel<G>) -> Result<&mut G> {
    if panel.data().is_none() {
        bail!("Could not load {} settings from the server", G::KIND);
    }
    panel.begin_edit();
    match panel.data_mut() {
        Some(data) => Ok(data),
        None => bail!("{} settings are not editable", G::KIND),
    }
}

/// Turn a save outcome into a command result. The error itself has already
/// been shown through the alert sink.
fn check(outcome: SaveOutcome, kind: GroupKind) -> Result<()> {
    match outcome {
        SaveOutcome::Saved => Ok(()),
        SaveOutcome::Failed => bail!("Failed to save {} settings", kind),
        SaveOutcome::Rejected => bail!("A save of {} settings is already in progress", kind),
    }
}

fn replace(field: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *field = value;
    }
}

/// Reject ids missing from a non-empty choice list.
fn validate_choice(what: &str, id: &str, options: &[TypeOption]) -> Result<()> {
    if options.is_empty() || options.iter().any(|option| option.id_string() == id) {
        return Ok(());
    }
    let known: Vec<String> = options.iter().map(TypeOption::id_string).collect();
    bail!("Unknown {} '{}', expected one of: {}", what, id, known.join(", "))
}

async fn set_location(
    ctx: &CommandContext,
    latitude: Option<f64>,
    longitude: Option<f64>,
    locate: bool,
) -> Result<()> {
    let mut controller = SystemSettingsController::new(ctx.services.clone());
    controller.activate().await;

    if locate {
        let Some(position) = controller.update_geolocation().await else {
            bail!("Could not determine the current position");
        };
        if !ctx.quiet {
            println!("Position: {}, {}", position.latitude, position.longitude);
        }
    } else {
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            bail!("Pass --latitude and --longitude, or --locate");
        };
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            bail!("Coordinates out of range: {}, {}", latitude, longitude);
        }
        let location = edit(&mut controller.location)?;
        location.latitude = Some(latitude);
        location.longitude = Some(longitude);
    }

    check(controller.save_location().await, controller.location.kind())
}

async fn set_controller(
    ctx: &CommandContext,
    alive_check_minutes: Option<f64>,
    page_refresh_seconds: Option<f64>,
    language: Option<String>,
    log_level: Option<String>,
) -> Result<()> {
    let mut controller = SystemSettingsController::new(ctx.services.clone());
    controller.activate().await;

    if let Some(language) = &language {
        validate_choice("language", language, &controller.languages)?;
    }
    if let Some(log_level) = &log_level {
        validate_choice("log level", log_level, &controller.log_levels)?;
    }

    let settings = edit(&mut controller.controller)?;
    replace(&mut settings.language, language);
    replace(&mut settings.resources_log_level, log_level);
    if alive_check_minutes.is_some() {
        controller.alive_check_minutes = alive_check_minutes;
    }
    if page_refresh_seconds.is_some() {
        controller.page_refresh_seconds = page_refresh_seconds;
    }

    check(controller.save_controller().await, controller.controller.kind())
}

async fn set_retention(
    ctx: &CommandContext,
    changes: &[(RetentionWindow, Option<RetentionDuration>)],
) -> Result<()> {
    if changes.iter().all(|(_, duration)| duration.is_none()) {
        bail!("Nothing to change, pass at least one retention window");
    }

    let mut controller = MetricsSettingsController::new(ctx.services.clone());
    controller.activate().await;
    if controller.retention_form.is_none() {
        bail!("Could not load retention settings from the server");
    }

    if controller.retention_warning(DialogSize::Medium).await == DialogOutcome::Dismissed {
        eprintln!("{}", format_warning("Cancelled", ctx.no_color));
        return Ok(());
    }

    if let Some(form) = controller.retention_form.as_mut() {
        for (window, duration) in changes {
            if let Some(duration) = duration {
                form.set(*window, *duration);
            }
        }
    }

    check(controller.save_retention().await, controller.retention.kind())
}
