//! Show command implementation.

use anyhow::{Result, anyhow};
use mycontroller_core::{
    MetricsSettingsController, MySensorsSettingsController, NotificationSettingsController,
    SystemSettingsController, UnitsSettingsController,
};
use mycontroller_types::{GroupKind, RetentionDuration, RetentionWindow, TypeOption};
use serde_json::json;

use crate::cli::{OutputFormat, Screen};
use crate::commands::CommandContext;
use crate::style::{format_field, format_title};

const MASK: &str = "********";

pub async fn cmd_show(ctx: &CommandContext, screen: Screen) -> Result<()> {
    let output = match screen {
        Screen::System => show_system(ctx).await?,
        Screen::Units => show_units(ctx).await?,
        Screen::Notifications => show_notifications(ctx).await?,
        Screen::Mysensors => show_mysensors(ctx).await?,
        Screen::Metrics => show_metrics(ctx).await?,
    };
    println!("{}", output);
    Ok(())
}

/// Fail the command when the initial load left a group empty.
pub(crate) fn require<G>(data: Option<&G>, kind: GroupKind) -> Result<&G> {
    data.ok_or_else(|| anyhow!("Could not load {} settings from the server", kind))
}

fn masked(value: Option<&String>) -> Option<&str> {
    value.map(|_| MASK)
}

fn display_name<'a>(options: &'a [TypeOption], id: Option<&'a str>) -> Option<&'a str> {
    let id = id?;
    options
        .iter()
        .find(|option| option.id_string() == id)
        .map(|option| option.display_name.as_str())
        .or(Some(id))
}

fn pretty(value: serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&value)?)
}

async fn show_system(ctx: &CommandContext) -> Result<String> {
    let mut system = SystemSettingsController::new(ctx.services.clone());
    system.activate().await;
    let location = require(system.location.data(), GroupKind::Location)?;
    let controller = require(system.controller.data(), GroupKind::Controller)?;

    if ctx.format == OutputFormat::Json {
        return pretty(json!({
            "location": location,
            "controller": controller,
            "aliveCheckMinutes": system.alive_check_minutes,
            "pageRefreshSeconds": system.page_refresh_seconds,
            "languages": system.languages,
            "logLevels": system.log_levels,
        }));
    }

    let nc = ctx.no_color;
    let latitude = location.latitude.map(|v| v.to_string());
    let longitude = location.longitude.map(|v| v.to_string());
    let minutes = system.alive_check_minutes.map(|v| format!("{} min", v));
    let seconds = system.page_refresh_seconds.map(|v| format!("{} s", v));

    let lines = [
        format_title("Location", nc),
        format_field("Latitude", latitude.as_deref(), nc),
        format_field("Longitude", longitude.as_deref(), nc),
        String::new(),
        format_title("Controller", nc),
        format_field("Alive check interval", minutes.as_deref(), nc),
        format_field("Page refresh time", seconds.as_deref(), nc),
        format_field(
            "Language",
            display_name(&system.languages, controller.language.as_deref()),
            nc,
        ),
        format_field(
            "Resources log level",
            display_name(&system.log_levels, controller.resources_log_level.as_deref()),
            nc,
        ),
        format_field("Date format", controller.date_format.as_deref(), nc),
        format_field("Time format", controller.time_format.as_deref(), nc),
    ];
    Ok(lines.join("\n"))
}

async fn show_units(ctx: &CommandContext) -> Result<String> {
    let mut controller = UnitsSettingsController::new(ctx.services.clone());
    controller.activate().await;
    let units = require(controller.units.data(), GroupKind::Units)?;

    if ctx.format == OutputFormat::Json {
        return pretty(json!(units));
    }

    let mut lines = vec![format_title("Units", ctx.no_color)];
    if units.variables.is_empty() {
        lines.push("  No variable units configured".to_string());
    }
    for variable in &units.variables {
        lines.push(format_field(
            &variable.variable,
            Some(variable.unit.as_str()),
            ctx.no_color,
        ));
    }
    Ok(lines.join("\n"))
}

async fn show_notifications(ctx: &CommandContext) -> Result<String> {
    let mut controller = NotificationSettingsController::new(ctx.services.clone());
    controller.activate().await;
    let email = require(controller.email.data(), GroupKind::Email)?;
    let sms = require(controller.sms.data(), GroupKind::Sms)?;
    let pushbullet = require(controller.pushbullet.data(), GroupKind::Pushbullet)?;

    if ctx.format == OutputFormat::Json {
        return pretty(json!({
            "email": email,
            "sms": sms,
            "pushbullet": pushbullet,
        }));
    }

    let nc = ctx.no_color;
    let port = email.smtp_port.map(|p| p.to_string());
    let ssl = email.enable_ssl.to_string();
    let active = pushbullet.active.to_string();

    let lines = [
        format_title("Email", nc),
        format_field("SMTP host", email.smtp_host.as_deref(), nc),
        format_field("SMTP port", port.as_deref(), nc),
        format_field("SMTP username", email.smtp_username.as_deref(), nc),
        format_field("SMTP password", masked(email.smtp_password.as_ref()), nc),
        format_field("SSL", Some(ssl.as_str()), nc),
        format_field("From address", email.from_address.as_deref(), nc),
        String::new(),
        format_title("SMS", nc),
        format_field("Vendor", sms.vendor.as_deref(), nc),
        format_field("Auth SID", sms.auth_sid.as_deref(), nc),
        format_field("Auth token", masked(sms.auth_token.as_ref()), nc),
        format_field("Phone number", sms.phone_number.as_deref(), nc),
        String::new(),
        format_title("Pushbullet", nc),
        format_field("Access token", masked(pushbullet.access_token.as_ref()), nc),
        format_field("Active", Some(active.as_str()), nc),
        format_field("Name", pushbullet.name.as_deref(), nc),
        format_field("Email", pushbullet.email.as_deref(), nc),
    ];
    Ok(lines.join("\n"))
}

async fn show_mysensors(ctx: &CommandContext) -> Result<String> {
    let mut controller = MySensorsSettingsController::new(ctx.services.clone());
    controller.activate().await;
    let settings = require(controller.mysensors.data(), GroupKind::MySensors)?;

    if ctx.format == OutputFormat::Json {
        return pretty(json!({
            "mySensors": settings,
            "defaultFirmwareName": controller.default_firmware_name,
            "firmwares": controller.firmwares,
        }));
    }

    let nc = ctx.no_color;
    let mut lines = vec![
        format_title("MySensors", nc),
        format_field("Default firmware", settings.default_firmware.as_deref(), nc),
        format_field(
            "Default firmware name",
            controller.default_firmware_name.as_deref(),
            nc,
        ),
    ];
    if !controller.firmwares.is_empty() {
        lines.push(String::new());
        lines.push(format_title("Available firmwares", nc));
        for firmware in &controller.firmwares {
            lines.push(format_field(
                &firmware.id_string(),
                Some(firmware.display_name.as_str()),
                nc,
            ));
        }
    }
    Ok(lines.join("\n"))
}

async fn show_metrics(ctx: &CommandContext) -> Result<String> {
    let mut controller = MetricsSettingsController::new(ctx.services.clone());
    controller.activate().await;
    let metrics = require(controller.metrics.data(), GroupKind::Metrics)?;
    let form = controller
        .retention_form
        .as_ref()
        .ok_or_else(|| anyhow!("Could not load {} settings from the server", GroupKind::MetricsRetention))?;

    if ctx.format == OutputFormat::Json {
        let retention: serde_json::Map<String, serde_json::Value> = RetentionWindow::ALL
            .iter()
            .map(|window| (window.label().to_string(), json!(form.get(*window))))
            .collect();
        return pretty(json!({
            "metrics": metrics,
            "metricsRetention": controller.retention.data(),
            "retention": retention,
        }));
    }

    let nc = ctx.no_color;
    let range = RetentionDuration::from_millis(metrics.default_time_range).to_string();
    let mut lines = vec![
        format_title("Metrics", nc),
        format_field("Default time range", Some(range.as_str()), nc),
        String::new(),
        format_title("Data retention", nc),
    ];
    for window in RetentionWindow::ALL {
        let value = form.get(window).to_string();
        lines.push(format_field(window.label(), Some(value.as_str()), nc));
    }
    Ok(lines.join("\n"))
}
