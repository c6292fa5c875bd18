use anyhow::{Context, Result};
use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{SdkTracerProvider, Tracer},
    Resource,
};
use opentelemetry_semantic_conventions::resource;
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, EnvFilter, Layer};

use crate::config::{Config, LogFormat, SpanExporterKind};

/// Keeps the tracer provider alive; flushes pending spans when dropped.
pub struct TelemetryGuard {
    tracer_provider: SdkTracerProvider,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let _ = self.tracer_provider.force_flush();
        let _ = self.tracer_provider.shutdown();
    }
}

pub fn init_subscribers(config: &Config) -> Result<TelemetryGuard> {
    // Filter
    let env_filter = build_env_filter_layer();

    // Layers
    let logger_layer = build_logger_layer(config.telemetry.log_format);
    let tracer_provider = build_tracer_provider(config)?;
    let otel_layer = build_otel_layer(&tracer_provider, &config.application.name);

    // Subscriber
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(logger_layer)
        .with(otel_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    Ok(TelemetryGuard { tracer_provider })
}

fn build_env_filter_layer() -> EnvFilter {
    let filter = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var("OTEL_LOG_LEVEL"))
        .unwrap_or_else(|_| LevelFilter::INFO.to_string());

    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(filter)
}

fn build_logger_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match format {
        LogFormat::Json => Box::new(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        ),
        LogFormat::Pretty => Box::new(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_line_number(true)
                .with_thread_names(true)
                .with_timer(tracing_subscriber::fmt::time::uptime())
                .with_target(true)
                .with_level(true)
                .with_file(true),
        ),
    }
}

/// Spans are recorded even without an exporter so trace context still flows
/// through outbound requests.
fn build_tracer_provider(config: &Config) -> Result<SdkTracerProvider> {
    let resource = Resource::builder()
        .with_attribute(KeyValue::new(
            resource::SERVICE_NAME,
            config.application.name.clone(),
        ))
        .with_attribute(KeyValue::new(
            resource::SERVICE_VERSION,
            config.application.version.clone(),
        ))
        .build();
    let builder = SdkTracerProvider::builder().with_resource(resource);

    let tracer_provider = match config.telemetry.exporter {
        SpanExporterKind::Otlp => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(config.telemetry.otlp_endpoint.clone())
                .build()
                .context("Failed to build OTLP span exporter")?;
            builder.with_batch_exporter(exporter).build()
        }
        SpanExporterKind::Stdout => builder
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build(),
        SpanExporterKind::None => builder.build(),
    };

    Ok(tracer_provider)
}

fn build_otel_layer<S>(
    tracer_provider: &SdkTracerProvider,
    service_name: &str,
) -> OpenTelemetryLayer<S, Tracer>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_opentelemetry::layer()
        .with_error_records_to_exceptions(true)
        .with_tracer(tracer_provider.tracer(service_name.to_string()))
}
