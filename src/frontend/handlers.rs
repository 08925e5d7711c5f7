use super::{
    FrontendState,
    views::{BatchView, EXAMPLES, SentimentView, collect_batch_texts},
};
use axum::{
    Form,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Html,
};
use minijinja::{Value, context};
use serde::Deserialize;
use tracing::{error, info};

type Page = Result<Html<String>, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct TextForm {
    #[serde(default)]
    pub text: String,
}

fn api_error(e: crate::Error) -> String {
    match e {
        crate::Error::Network(e) => format!("API Error: {}", e),
        other => format!("API Error: {}", other),
    }
}

/// Renders `template` with the sidebar context merged in.
async fn render(state: &FrontendState, template: &str, active_tab: &str, page: Value) -> Page {
    let api_healthy = state.client.health().await;
    let ctx = context! {
        api_healthy,
        api_base_url => state.client.base_url(),
        active_tab,
        ..page
    };
    state
        .templates
        .get_template(template)
        .and_then(|t| t.render(ctx))
        .map(Html)
        .map_err(|e| {
            error!("Template rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error".to_string())
        })
}

pub async fn single_page(State(state): State<FrontendState>) -> Page {
    render(&state, "single.html", "single", context! { text => "" }).await
}

pub async fn analyze(State(state): State<FrontendState>, Form(form): Form<TextForm>) -> Page {
    let trimmed = form.text.trim();
    if trimmed.is_empty() {
        let page = context! {
            text => form.text,
            warning => "Please enter some text to analyze!",
        };
        return render(&state, "single.html", "single", page).await;
    }

    let outcome = state.client.predict(trimmed).await;
    let page = match outcome {
        Ok(prediction) => context! {
            text => form.text,
            result => SentimentView::from(prediction),
        },
        Err(e) => context! {
            text => form.text,
            error => api_error(e),
        },
    };
    render(&state, "single.html", "single", page).await
}

pub async fn batch_page(State(state): State<FrontendState>) -> Page {
    render(&state, "batch.html", "batch", context! { text => "" }).await
}

pub async fn analyze_batch(State(state): State<FrontendState>, mut multipart: Multipart) -> Page {
    let mut file_content: Option<String> = None;
    let mut manual = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((StatusCode::BAD_REQUEST, format!("Invalid form data: {}", e))),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid upload: {}", e)))?;
                if bytes.is_empty() {
                    continue;
                }
                match String::from_utf8(bytes.to_vec()) {
                    Ok(content) => file_content = Some(content),
                    Err(_) => {
                        let page = context! {
                            text => manual,
                            error => "Uploaded file is not valid UTF-8 text",
                        };
                        return render(&state, "batch.html", "batch", page).await;
                    }
                }
            }
            Some("text") => {
                manual = field
                    .text()
                    .await
                    .map_err(|e| (StatusCode::BAD_REQUEST, format!("Invalid text: {}", e)))?;
            }
            _ => {}
        }
    }

    let texts = collect_batch_texts(file_content.as_deref(), &manual);
    if texts.is_empty() {
        let page = context! {
            text => manual,
            warning => "Please provide texts to analyze!",
        };
        return render(&state, "batch.html", "batch", page).await;
    }

    info!("Analyzing {} texts", texts.len());
    let page = match state.client.batch_predict(&texts).await {
        Ok(response) => context! {
            text => manual,
            batch => BatchView::from(response),
        },
        Err(e) => context! {
            text => manual,
            error => api_error(e),
        },
    };
    render(&state, "batch.html", "batch", page).await
}

pub async fn examples_page(State(state): State<FrontendState>) -> Page {
    render(&state, "examples.html", "examples", context! { examples => EXAMPLES }).await
}

pub async fn analyze_example(
    State(state): State<FrontendState>,
    Path(index): Path<usize>,
) -> Page {
    let example = EXAMPLES
        .get(index)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No example {}", index)))?;

    let page = match state.client.predict(example).await {
        Ok(prediction) => context! {
            examples => EXAMPLES,
            selected => index,
            result => SentimentView::from(prediction),
        },
        Err(e) => context! {
            examples => EXAMPLES,
            selected => index,
            error => api_error(e),
        },
    };
    render(&state, "examples.html", "examples", page).await
}
