//! Request orchestration: validate → resolve location → fetch weather → convert.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

use crate::observability::{SpanKind, TraceContext, Tracer};
use crate::pipeline::error::PipelineResult;
use crate::pipeline::postal_code::PostalCode;
use crate::pipeline::temperature::Temperatures;
use crate::pipeline::types::WeatherReport;
use crate::upstream::{LocationLookup, WeatherLookup};

/// Runs the lookup pipeline for one request at a time; holds no per-request state.
#[derive(Clone)]
pub struct WeatherService {
    locations: Arc<dyn LocationLookup>,
    weather: Arc<dyn WeatherLookup>,
    tracer: Tracer,
}

impl WeatherService {
    pub fn new(
        locations: Arc<dyn LocationLookup>,
        weather: Arc<dyn WeatherLookup>,
        tracer: Tracer,
    ) -> Self {
        Self {
            locations,
            weather,
            tracer,
        }
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    /// Produce a weather report for `raw_cep`.
    ///
    /// `parent` is the context of the caller's span; each outbound stage runs
    /// in its own child span. Nothing is called upstream unless the postal
    /// code is valid.
    pub async fn lookup(
        &self,
        raw_cep: &str,
        parent: &TraceContext,
    ) -> PipelineResult<WeatherReport> {
        let cep = PostalCode::parse(raw_cep)?;

        let locations = &self.locations;
        let cep_ref = &cep;
        let location = self
            .traced(parent, "resolve_location", ("cep", cep.to_string()), |ctx| async move {
                locations.resolve(cep_ref, &ctx).await
            })
            .await?;

        tracing::debug!(cep = %cep, city = %location.city, "Location resolved");

        // The weather provider matches lower-cased names.
        let city = location.city.to_lowercase();
        let weather = &self.weather;
        let city_ref = city.as_str();
        let sample = self
            .traced(parent, "fetch_weather", ("city", city.clone()), |ctx| async move {
                weather.fetch_weather(city_ref, &ctx).await
            })
            .await?;

        tracing::debug!(city = %location.city, temp_kelvin = sample.temp_kelvin, "Weather fetched");

        Ok(WeatherReport::new(
            location.city,
            Temperatures::from_kelvin(sample.temp_kelvin),
        ))
    }

    /// Run `stage` inside a client span that closes however the stage ends.
    async fn traced<T, E, F, Fut>(
        &self,
        parent: &TraceContext,
        name: &'static str,
        tag: (&'static str, String),
        stage: F,
    ) -> Result<T, E>
    where
        F: FnOnce(TraceContext) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut span = self.tracer.start_span(parent, name, SpanKind::Client);
        span.set_tag(tag.0, tag.1);

        let result = stage(span.context().clone())
            .instrument(span.span().clone())
            .await;

        if let Err(e) = &result {
            span.record_error(e.to_string());
        }
        span.end();

        result
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}
