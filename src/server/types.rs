use crate::model::ModelInfo;
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub text: String,
    pub label: String,
    pub score: f64,
    pub confidence_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    /// `{}` on the wire while no model is loaded.
    #[serde(
        default,
        serialize_with = "info_or_empty",
        deserialize_with = "empty_as_none"
    )]
    pub model_info: Option<ModelInfo>,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

fn info_or_empty<S: Serializer>(info: &Option<ModelInfo>, serializer: S) -> Result<S::Ok, S::Error> {
    match info {
        Some(info) => info.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ModelInfo>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Info(ModelInfo),
        Empty {},
    }

    Ok(match Option::<Wire>::deserialize(deserializer)? {
        Some(Wire::Info(info)) => Some(info),
        Some(Wire::Empty {}) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(model_info: Option<ModelInfo>) -> StatusResponse {
        StatusResponse {
            message: "up".to_string(),
            model_loaded: model_info.is_some(),
            model_info,
        }
    }

    #[test]
    fn unloaded_model_info_is_an_empty_object() {
        let value = serde_json::to_value(status(None)).unwrap();
        assert_eq!(value["model_info"], json!({}));
    }

    #[test]
    fn status_reads_back_either_shape() {
        let loaded: StatusResponse =
            serde_json::from_value(serde_json::to_value(status(Some(ModelInfo::new("m")))).unwrap())
                .unwrap();
        assert_eq!(loaded.model_info.unwrap().model_path, "m");

        let unloaded: StatusResponse = serde_json::from_value(
            json!({ "message": "up", "model_info": {}, "model_loaded": false }),
        )
        .unwrap();
        assert!(unloaded.model_info.is_none());
    }
}
