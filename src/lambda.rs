use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;
use store_rankings::utils::logger;
use store_rankings::{handle_list, DefaultDispatcher, LambdaConfig, ListRequest, RouterResponse};

async fn function_handler(
    dispatcher: &DefaultDispatcher,
    event: LambdaEvent<ListRequest>,
) -> Result<RouterResponse, Error> {
    let request = event.payload;
    tracing::info!(
        "📥 List request: store={}, collection={}, country={}",
        request.store,
        request.collection,
        request.country
    );

    let response = handle_list(dispatcher, &request).await;
    tracing::info!("📤 Responding with status {}", response.status_code);
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時建立一次，之後的呼叫共用 HTTP 連線
    let config = LambdaConfig::from_env()?;
    let dispatcher = Arc::new(DefaultDispatcher::from_config(&config.catalog)?);

    run(service_fn(move |event: LambdaEvent<ListRequest>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { function_handler(&dispatcher, event).await }
    }))
    .await
}
