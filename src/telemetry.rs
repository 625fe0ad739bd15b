//! Tracing and OpenTelemetry setup.
//!
//! Log output goes through tracing-subscriber (json or pretty, per
//! config); when OTLP export is enabled, spans are additionally shipped
//! through the OpenTelemetry batch exporter.

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter,
    fmt::format::FmtSpan,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LoggingFormat, TelemetryConfig};

/// Keeps the tracer provider alive; dropping it flushes pending spans.
pub struct OtelGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.as_mut()
            && let Err(err) = provider.shutdown()
        {
            eprintln!("{err:?}");
        }
    }
}

fn tracer_provider(service_name: String) -> SdkTracerProvider {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()
        .unwrap();

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .with_attributes(vec![
            opentelemetry::KeyValue::new(
                opentelemetry_semantic_conventions::attribute::SERVICE_VERSION,
                env!("CARGO_PKG_VERSION"),
            ),
            opentelemetry::KeyValue::new("entity.name", service_name),
        ])
        .build();

    SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .build()
}

/// Initializes the global subscriber. `RUST_LOG` wins over the configured
/// levels when set.
pub fn init(config: &TelemetryConfig) -> OtelGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},axum={}",
            tracing::Level::from(config.level),
            tracing::Level::from(config.axum_level),
        ))
    });

    let fmt_layer = match config.format {
        LoggingFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .boxed(),
        LoggingFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
    };

    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);

    if config.otlp_enabled {
        opentelemetry::global::set_text_map_propagator(
            opentelemetry_sdk::propagation::TraceContextPropagator::new(),
        );

        let provider = tracer_provider(config.service_name.clone());
        let tracer = provider.tracer("keywarden");

        registry
            .with(tracing_opentelemetry::OpenTelemetryLayer::new(tracer))
            .init();

        OtelGuard {
            tracer_provider: Some(provider),
        }
    } else {
        registry.init();
        OtelGuard {
            tracer_provider: None,
        }
    }
}
