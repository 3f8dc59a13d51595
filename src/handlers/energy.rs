use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};

use crate::error::Result;
use crate::models::ConsumptionResponse;
use crate::services::EnergyService;

pub async fn consumption(
    State(service): State<EnergyService>,
) -> Result<Json<ConsumptionResponse>> {
    let response = service.appliances_consumption().await?;
    Ok(Json(response))
}

/// Same data as [`consumption`], rendered as an HTML table. Row order
/// matches the JSON list order.
pub async fn consumption_table(State(service): State<EnergyService>) -> Result<Html<String>> {
    let response = service.appliances_consumption().await?;
    Ok(Html(render_table(&response)))
}

pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

fn render_table(response: &ConsumptionResponse) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head><title>Appliance consumption</title></head>\n<body>\n\
         <table border=\"1\">\n<tr><th>Appliance</th><th>Energy (Wh)</th></tr>\n",
    );

    for row in &response.appliance_consumption {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}</td></tr>\n",
            row.appliance, row.energy_wh
        ));
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}
