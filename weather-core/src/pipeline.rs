use tracing::{info, instrument, warn};

use crate::{
    Config,
    error::PipelineOutcome,
    model::{PlaceName, WeatherSnapshot},
    provider::{
        ConditionsFetcher, LocationResolver, OpenMeteoForecast, OpenMeteoGeocoder, http_client,
    },
};

/// Runs name resolution then conditions retrieval, strictly in that order.
#[derive(Debug)]
pub struct WeatherPipeline {
    resolver: Box<dyn LocationResolver>,
    fetcher: Box<dyn ConditionsFetcher>,
}

impl WeatherPipeline {
    pub fn new(resolver: Box<dyn LocationResolver>, fetcher: Box<dyn ConditionsFetcher>) -> Self {
        Self { resolver, fetcher }
    }

    /// Construct the Open-Meteo backed pipeline described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config)?;

        Ok(Self::new(
            Box::new(OpenMeteoGeocoder::new(http.clone(), config)),
            Box::new(OpenMeteoForecast::new(http, config)),
        ))
    }

    /// One query: exactly one call to each upstream, the second only if the first succeeded.
    #[instrument(skip_all, fields(place = %place))]
    pub async fn query(&self, place: &PlaceName) -> PipelineOutcome {
        let location = self.resolver.resolve(place).await.inspect_err(|e| {
            warn!(error = %e, "location lookup failed");
        })?;

        let conditions = self.fetcher.fetch(&location).await.inspect_err(|e| {
            warn!(error = %e, "conditions lookup failed");
        })?;

        let snapshot = WeatherSnapshot::assemble(location, conditions);
        info!(
            name = %snapshot.resolved_name,
            condition = snapshot.condition_text,
            "query complete"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{
        error::QueryError,
        model::{ConditionsData, GeoLocation},
    };
    use async_trait::async_trait;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    pub(crate) struct FakeResolver {
        pub outcome: Result<GeoLocation, QueryError>,
        pub calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LocationResolver for FakeResolver {
        async fn resolve(&self, _place: &PlaceName) -> Result<GeoLocation, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    #[derive(Debug)]
    pub(crate) struct FakeFetcher {
        pub outcome: Result<ConditionsData, QueryError>,
        pub calls: Arc<AtomicUsize>,
        pub seen: Arc<std::sync::Mutex<Option<GeoLocation>>>,
    }

    #[async_trait]
    impl ConditionsFetcher for FakeFetcher {
        async fn fetch(&self, location: &GeoLocation) -> Result<ConditionsData, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(location.clone());
            self.outcome.clone()
        }
    }

    pub(crate) fn paris() -> GeoLocation {
        GeoLocation {
            latitude: 48.85341,
            longitude: 2.3488,
            resolved_name: "Paris".into(),
            country: "France".into(),
        }
    }

    pub(crate) fn mild() -> ConditionsData {
        ConditionsData {
            temperature_c: 18.5,
            humidity_pct: 60,
            wind_speed_kph: 12.3,
            condition_code: 1,
            observed_at: None,
        }
    }

    pub(crate) struct Harness {
        pub pipeline: WeatherPipeline,
        pub resolver_calls: Arc<AtomicUsize>,
        pub fetcher_calls: Arc<AtomicUsize>,
        pub seen: Arc<std::sync::Mutex<Option<GeoLocation>>>,
    }

    pub(crate) fn harness(
        resolved: Result<GeoLocation, QueryError>,
        fetched: Result<ConditionsData, QueryError>,
    ) -> Harness {
        let resolver_calls = Arc::new(AtomicUsize::new(0));
        let fetcher_calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(std::sync::Mutex::new(None));

        let pipeline = WeatherPipeline::new(
            Box::new(FakeResolver { outcome: resolved, calls: resolver_calls.clone() }),
            Box::new(FakeFetcher {
                outcome: fetched,
                calls: fetcher_calls.clone(),
                seen: seen.clone(),
            }),
        );

        Harness { pipeline, resolver_calls, fetcher_calls, seen }
    }

    fn place(name: &str) -> PlaceName {
        PlaceName::parse(name).expect("valid place name")
    }

    #[tokio::test]
    async fn successful_query_builds_snapshot() {
        let h = harness(Ok(paris()), Ok(mild()));

        let snapshot = h.pipeline.query(&place("Paris")).await.expect("snapshot");

        assert_eq!(snapshot.resolved_name, "Paris");
        assert_eq!(snapshot.country, "France");
        assert_eq!(snapshot.temperature_c, 18.5);
        assert_eq!(snapshot.humidity_pct, 60);
        assert_eq!(snapshot.wind_speed_kph, 12.3);
        assert_eq!(snapshot.condition_text, "Mainly clear");
        assert_eq!(h.seen.lock().unwrap().as_ref(), Some(&paris()));
        assert_eq!(h.resolver_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.fetcher_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn not_found_skips_conditions_call() {
        let not_found = QueryError::NotFound { place: "Zzqqxx123".into() };
        let h = harness(Err(not_found.clone()), Ok(mild()));

        let err = h.pipeline.query(&place("Zzqqxx123")).await.unwrap_err();

        assert_eq!(err, not_found);
        assert_eq!(h.fetcher_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn resolver_network_error_skips_conditions_call() {
        let h = harness(Err(QueryError::Network("refused".into())), Ok(mild()));

        let err = h.pipeline.query(&place("Paris")).await.unwrap_err();

        assert_eq!(err, QueryError::Network("refused".into()));
        assert_eq!(h.fetcher_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetcher_failures_propagate_unchanged() {
        for failure in [
            QueryError::Network("timed out".into()),
            QueryError::MalformedResponse("missing relative_humidity_2m".into()),
        ] {
            let h = harness(Ok(paris()), Err(failure.clone()));

            let err = h.pipeline.query(&place("Paris")).await.unwrap_err();

            assert_eq!(err, failure);
            assert_eq!(h.resolver_calls.load(Ordering::SeqCst), 1);
            assert_eq!(h.fetcher_calls.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn pipeline_builds_from_default_config() {
        assert!(WeatherPipeline::from_config(&Config::default()).is_ok());
    }
}
