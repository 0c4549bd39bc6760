//! Weekday plus relative duration, composed for display.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::database::StrategyDatabase;
use crate::duration::{DurationStyle, DurationWidths, RelativeDurationFormatter};
use crate::error::Result;
use crate::locale::LocaleId;
use crate::resolver::WeekdayResolver;
use crate::text_service::LocaleTextService;

#[derive(Debug, Clone)]
pub struct FormatRequest {
    pub target: DateTime<Utc>,
    /// Defaults to now.
    pub reference: Option<DateTime<Utc>>,
    pub locale: String,
    pub style: DurationStyle,
    /// Defaults to the formatter's configured zone.
    pub timezone: Option<Tz>,
}

impl FormatRequest {
    pub fn new(target: DateTime<Utc>, locale: impl Into<String>) -> Self {
        Self {
            target,
            reference: None,
            locale: locale.into(),
            style: DurationStyle::default(),
            timezone: None,
        }
    }

    pub fn reference(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn style(mut self, style: DurationStyle) -> Self {
        self.style = style;
        self
    }

    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = Some(timezone);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedRelative {
    /// Database key the weekday was resolved with.
    pub locale: String,
    pub weekday: String,
    pub duration: String,
}

impl FormattedRelative {
    pub fn text(&self) -> String {
        format!("{} ({})", self.weekday, self.duration)
    }
}

impl fmt::Display for FormattedRelative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.weekday, self.duration)
    }
}

#[derive(Clone)]
pub struct WeekdayFormatter {
    resolver: WeekdayResolver,
    durations: RelativeDurationFormatter,
    timezone: Tz,
}

impl WeekdayFormatter {
    pub fn new(
        resolver: WeekdayResolver,
        durations: RelativeDurationFormatter,
        timezone: Tz,
    ) -> Self {
        Self {
            resolver,
            durations,
            timezone,
        }
    }

    pub fn resolver(&self) -> &WeekdayResolver {
        &self.resolver
    }

    pub fn format(&self, request: &FormatRequest) -> Result<FormattedRelative> {
        let reference = request.reference.unwrap_or_else(Utc::now);
        let timezone = request.timezone.unwrap_or(self.timezone);
        let day = request
            .target
            .with_timezone(&timezone)
            .weekday()
            .num_days_from_sunday() as u8;

        let found = self.resolver.lookup(&request.locale);
        let weekday = found
            .strategy
            .token(self.resolver.service(), &found.key, usize::from(day))?;
        let duration = self.durations.format(
            request.target,
            reference,
            &self.phrase_locale(&found.key),
            request.style,
        )?;

        Ok(FormattedRelative {
            locale: found.key.to_string(),
            weekday,
            duration,
        })
    }

    /// Locale the duration is phrased in: the text service's match for the
    /// weekday key, else its match for the default locale.
    fn phrase_locale(&self, key: &LocaleId) -> LocaleId {
        let service = self.resolver.service();
        service
            .resolve_locale(key.as_str())
            .or_else(|| service.resolve_locale(self.resolver.default_locale().as_str()))
            .unwrap_or_else(|| key.clone())
    }
}

/// Builds a formatter whose resolver and duration formatter share `service`.
pub fn formatter_from_parts(
    database: Arc<StrategyDatabase>,
    service: Arc<dyn LocaleTextService>,
    default_locale: LocaleId,
    widths: DurationWidths,
    timezone: Tz,
) -> Result<WeekdayFormatter> {
    let resolver = WeekdayResolver::new(database, service.clone(), default_locale)?;
    let durations = RelativeDurationFormatter::with_widths(service, widths);
    Ok(WeekdayFormatter::new(resolver, durations, timezone))
}
