use flowplug::core::{NodeDescriptor, Token};
use flowplug::engine::SourceWorker;
use flowplug::nodes::manual_source::NUMBER_PORT;
use flowplug::registry;
use serde_json::json;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowplug=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Manual source -> fizz -> console sink
    let source = registry::instantiate(
        &NodeDescriptor::new("source", "manualsource")
            .with_configuration(json!({ "port": NUMBER_PORT })),
    )?
    .into_source()?;
    let mut fizz = registry::instantiate(
        &NodeDescriptor::new("fizz", "fizzoperator").with_configuration(json!({ "tag": "rust" })),
    )?
    .into_operator()?;
    let mut display =
        registry::instantiate(&NodeDescriptor::new("display", "consolesink"))?.into_sink()?;

    let worker = SourceWorker::spawn(source, 8)?;
    let outputs = worker.outputs().clone();

    loop {
        let rx = outputs.clone();
        let Some(result) = tokio::task::spawn_blocking(move || rx.recv().ok()).await? else {
            break;
        };

        let produced = match result {
            Ok(produced) => produced,
            // Already reported by the worker.
            Err(e) if !e.is_fatal() => continue,
            Err(e) => return Err(e.into()),
        };

        for output in produced {
            let Some(fizzed) = fizz.cycle(vec![Token::ready(output.port_id, output.data)])? else {
                continue;
            };
            for value in fizzed {
                display.cycle(vec![Token::ready(value.port_id, value.data)])?;
            }
        }
    }

    worker.join();
    fizz.tear_down();
    display.tear_down();
    Ok(())
}
