//! Integration tests for the pipeline client using wiremock
//!
//! Both the ULCA configuration endpoint and the Dhruva inference endpoint are
//! served by one mock server under their real paths.

use integration_bhashini::{
    AudioFormat, AvailableLanguages, Gender, PipelineClient, PipelineClientConfig, PipelineError,
    TaskType, response,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path},
};

const CONFIG_PATH: &str = "/ulca/apis/v0/model/getModelsPipeline";
const INFERENCE_PATH: &str = "/services/inference/pipeline";

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config(mock_server: &MockServer) -> PipelineClientConfig {
    PipelineClientConfig::new("test-user", "test-ulca-key")
        .with_pipeline_id("test-pipeline")
        .with_endpoints(
            format!("{}{CONFIG_PATH}", mock_server.uri()),
            format!("{}{INFERENCE_PATH}", mock_server.uri()),
        )
}

/// Pipeline configuration with one ASR, two translation and two TTS services
fn sample_pipeline_config() -> serde_json::Value {
    serde_json::json!({
        "languages": [],
        "pipelineResponseConfig": [
            {
                "taskType": "asr",
                "config": [{
                    "serviceId": "svc1",
                    "modelId": "asr-model",
                    "language": { "sourceLanguage": "hi", "sourceScriptCode": "Deva" },
                    "domain": ["general"]
                }]
            },
            {
                "taskType": "translation",
                "config": [
                    {
                        "serviceId": "svc2",
                        "language": {
                            "sourceLanguage": "hi",
                            "sourceScriptCode": "Deva",
                            "targetLanguage": "gu",
                            "targetScriptCode": "Gujr"
                        }
                    },
                    {
                        "serviceId": "svc-ta",
                        "language": { "sourceLanguage": "hi", "targetLanguage": "ta" }
                    },
                    {
                        "serviceId": "svc-en-hi",
                        "language": { "sourceLanguage": "en", "targetLanguage": "hi" }
                    }
                ]
            },
            {
                "taskType": "tts",
                "config": [
                    {
                        "serviceId": "tts-gu",
                        "language": { "sourceLanguage": "gu" },
                        "supportedVoices": ["female"]
                    },
                    {
                        "serviceId": "tts-hi",
                        "language": { "sourceLanguage": "hi" },
                        "supportedVoices": []
                    }
                ]
            }
        ],
        "pipelineInferenceAPIEndPoint": {
            "callbackUrl": "https://dhruva-api.bhashini.gov.in/services/inference/pipeline",
            "inferenceApiKey": { "name": "Authorization", "value": "test-inference-key" },
            "isMultilingualEnabled": true,
            "isSyncApi": true
        }
    })
}

async fn mount_pipeline_config(mock_server: &MockServer, config: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(config))
        .expect(1)
        .mount(mock_server)
        .await;
}

async fn connected_client(mock_server: &MockServer) -> PipelineClient {
    mount_pipeline_config(mock_server, sample_pipeline_config()).await;

    #[allow(clippy::expect_used)]
    PipelineClient::connect(test_config(mock_server))
        .await
        .expect("Failed to connect")
}

fn asr_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "pipelineResponse": [{
            "taskType": "asr",
            "config": null,
            "output": [{ "source": text }],
            "audio": null
        }]
    })
}

// =============================================================================
// Construction
// =============================================================================

#[tokio::test]
async fn connect_sends_credentials_and_requested_tasks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CONFIG_PATH))
        .and(header("userID", "test-user"))
        .and(header("ulcaApiKey", "test-ulca-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "pipelineTasks": [
                { "taskType": "asr" },
                { "taskType": "translation" },
                { "taskType": "tts" }
            ],
            "pipelineRequestConfig": { "pipelineId": "test-pipeline" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_pipeline_config()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = PipelineClient::connect(test_config(&mock_server)).await;

    assert!(client.is_ok(), "connect failed: {:?}", client.err());
    let client = client.unwrap();
    assert_eq!(
        client.callback_url(),
        "https://dhruva-api.bhashini.gov.in/services/inference/pipeline"
    );
}

#[tokio::test]
async fn connect_fails_on_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = PipelineClient::connect(test_config(&mock_server)).await;

    match result {
        Err(PipelineError::Configuration(message)) => {
            assert!(message.contains("401"));
            assert!(message.contains("Invalid API key"));
        },
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_fails_when_endpoint_unreachable() {
    let config = PipelineClientConfig::new("user", "key")
        .with_endpoints("http://127.0.0.1:1/config", "http://127.0.0.1:1/infer");

    let result = PipelineClient::connect(config).await;

    assert!(matches!(result, Err(PipelineError::Configuration(_))));
}

#[tokio::test]
async fn connect_fails_on_missing_keys() {
    let mock_server = MockServer::start().await;
    mount_pipeline_config(
        &mock_server,
        serde_json::json!({ "pipelineResponseConfig": [] }),
    )
    .await;

    let result = PipelineClient::connect(test_config(&mock_server)).await;

    match result {
        Err(PipelineError::Parse(message)) => {
            assert!(message.contains("pipelineInferenceAPIEndPoint"));
        },
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_fails_on_non_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CONFIG_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let result = PipelineClient::connect(test_config(&mock_server)).await;

    assert!(matches!(result, Err(PipelineError::Parse(_))));
}

#[tokio::test]
async fn connect_rejects_invalid_config_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(&mock_server);
    let config = PipelineClientConfig {
        user_id: String::new(),
        ..config
    };

    let result = PipelineClient::connect(config).await;

    assert!(matches!(result, Err(PipelineError::Configuration(_))));
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn lists_languages_from_parsed_config() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    let asr = client.list_available_languages("asr").unwrap();
    assert_eq!(
        asr,
        AvailableLanguages::Languages(["hi".to_string()].into_iter().collect())
    );

    let AvailableLanguages::Pairs(pairs) = client.list_available_languages("translation").unwrap()
    else {
        panic!("translation listing should be pairs");
    };
    let sources: Vec<&str> = pairs.keys().map(String::as_str).collect();
    assert_eq!(sources, vec!["hi", "en"]);
    let hi_targets: Vec<&str> = pairs["hi"].iter().map(String::as_str).collect();
    assert_eq!(hi_targets, vec!["gu", "ta"]);
    let en_targets: Vec<&str> = pairs["en"].iter().map(String::as_str).collect();
    assert_eq!(en_targets, vec!["hi"]);

    assert!(matches!(
        client.list_available_languages("ocr"),
        Err(PipelineError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn listings_follow_configuration_order() {
    let mock_server = MockServer::start().await;

    let mut config = sample_pipeline_config();
    config["pipelineResponseConfig"][0]["config"] = serde_json::json!([
        { "serviceId": "asr-ta", "language": { "sourceLanguage": "ta" } },
        { "serviceId": "svc1", "language": { "sourceLanguage": "hi" } }
    ]);
    config["pipelineResponseConfig"][1]["config"] = serde_json::json!([
        { "serviceId": "svc-ta", "language": { "sourceLanguage": "hi", "targetLanguage": "ta" } },
        { "serviceId": "svc2", "language": { "sourceLanguage": "hi", "targetLanguage": "gu" } }
    ]);
    mount_pipeline_config(&mock_server, config).await;
    let client = PipelineClient::connect(test_config(&mock_server)).await.unwrap();

    let AvailableLanguages::Languages(asr) = client.list_available_languages("asr").unwrap()
    else {
        panic!("asr listing should be languages");
    };
    let asr: Vec<&str> = asr.iter().map(String::as_str).collect();
    assert_eq!(asr, vec!["ta", "hi"]);

    let AvailableLanguages::Pairs(pairs) = client.list_available_languages("translation").unwrap()
    else {
        panic!("translation listing should be pairs");
    };
    let hi_targets: Vec<&str> = pairs["hi"].iter().map(String::as_str).collect();
    assert_eq!(hi_targets, vec!["ta", "gu"]);

    match client.translate("text", "hi", "en").await {
        Err(PipelineError::UnsupportedLanguagePair { available, .. }) => {
            assert_eq!(available, vec!["ta", "gu"]);
        },
        other => panic!("expected unsupported pair, got {other:?}"),
    }

    let serialized = serde_json::to_value(client.languages(TaskType::Asr)).unwrap();
    assert_eq!(serialized, serde_json::json!(["ta", "hi"]));
}

#[tokio::test]
async fn supported_voices_come_from_first_entry() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    assert_eq!(client.get_supported_voices("gu").unwrap(), ["female"]);
    assert!(client.get_supported_voices("hi").unwrap().is_empty());
    assert!(matches!(
        client.get_supported_voices("ta"),
        Err(PipelineError::UnsupportedLanguage {
            task: TaskType::Tts,
            ..
        })
    ));
}

// =============================================================================
// ASR
// =============================================================================

#[tokio::test]
async fn asr_uses_first_service_and_inference_key() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(header("Authorization", "test-inference-key"))
        .and(header("Accept", "*/*"))
        .and(body_json(serde_json::json!({
            "pipelineTasks": [{
                "taskType": "asr",
                "config": {
                    "language": { "sourceLanguage": "hi" },
                    "serviceId": "svc1",
                    "audioFormat": "wav",
                    "samplingRate": 16000
                }
            }],
            "inputData": { "audio": [{ "audioContent": "UklGRgAAAAA=" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(asr_response("नमस्ते")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let audio = b"RIFF\0\0\0\0";
    let result = client.asr(audio, "hi", AudioFormat::Wav, 16_000).await;

    assert!(result.is_ok(), "asr failed: {:?}", result.err());
    let body = result.unwrap();
    assert_eq!(response::transcript(&body), Some("नमस्ते"));
    assert_eq!(body, asr_response("नमस्ते"));
}

#[tokio::test]
async fn asr_service_follows_configuration_order() {
    let mock_server = MockServer::start().await;

    let mut config = sample_pipeline_config();
    config["pipelineResponseConfig"][0]["config"] = serde_json::json!([
        { "serviceId": "svc-later", "language": { "sourceLanguage": "hi" } },
        { "serviceId": "svc1", "language": { "sourceLanguage": "hi" } }
    ]);
    mount_pipeline_config(&mock_server, config).await;
    let client = PipelineClient::connect(test_config(&mock_server)).await.unwrap();

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_partial_json(serde_json::json!({
            "pipelineTasks": [{ "config": { "serviceId": "svc-later" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(asr_response("ok")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.asr(b"audio", "hi", AudioFormat::Flac, 8_000).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn asr_unsupported_language_makes_no_request() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client.asr(b"audio", "ta", AudioFormat::Wav, 16_000).await;

    match result {
        Err(PipelineError::UnsupportedLanguage { available, .. }) => {
            assert_eq!(available, vec!["hi"]);
        },
        other => panic!("expected unsupported language, got {other:?}"),
    }
}

// =============================================================================
// Translation
// =============================================================================

#[tokio::test]
async fn translate_supported_pair() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_json(serde_json::json!({
            "pipelineTasks": [{
                "taskType": "translation",
                "config": {
                    "language": { "sourceLanguage": "hi", "targetLanguage": "gu" },
                    "serviceId": "svc2"
                }
            }],
            "inputData": { "input": [{ "source": "मेरा नाम विहिर है।" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "pipelineResponse": [{
                "taskType": "translation",
                "output": [{ "source": "मेरा नाम विहिर है।", "target": "મારું નામ વિહિર છે." }]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client
        .translate("मेरा नाम विहिर है।", "hi", "gu")
        .await
        .unwrap();

    assert_eq!(response::translated_text(&body), Some("મારું નામ વિહિર છે."));
}

#[tokio::test]
async fn translate_service_follows_configuration_order() {
    let mock_server = MockServer::start().await;

    let mut config = sample_pipeline_config();
    config["pipelineResponseConfig"][1]["config"] = serde_json::json!([
        { "serviceId": "svc-gu-first", "language": { "sourceLanguage": "hi", "targetLanguage": "gu" } },
        { "serviceId": "svc2", "language": { "sourceLanguage": "hi", "targetLanguage": "gu" } }
    ]);
    mount_pipeline_config(&mock_server, config).await;
    let client = PipelineClient::connect(test_config(&mock_server)).await.unwrap();

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_partial_json(serde_json::json!({
            "pipelineTasks": [{ "config": { "serviceId": "svc-gu-first" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.translate("text", "hi", "gu").await;

    assert!(result.is_ok(), "translate failed: {:?}", result.err());
}

#[tokio::test]
async fn translate_unsupported_pair() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    let result = client.translate("text", "hi", "en").await;

    match result {
        Err(PipelineError::UnsupportedLanguagePair {
            source_language,
            target_language,
            available,
        }) => {
            assert_eq!(source_language, "hi");
            assert_eq!(target_language, "en");
            assert_eq!(available, vec!["gu", "ta"]);
        },
        other => panic!("expected unsupported pair, got {other:?}"),
    }
}

// =============================================================================
// TTS
// =============================================================================

#[tokio::test]
async fn tts_accepts_any_gender_when_voices_unlisted() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_json(serde_json::json!({
            "pipelineTasks": [{
                "taskType": "tts",
                "config": {
                    "language": { "sourceLanguage": "hi" },
                    "serviceId": "tts-hi",
                    "gender": "male",
                    "samplingRate": 8000
                }
            }],
            "inputData": { "input": [{ "source": "नमस्ते" }] }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "pipelineResponse": [{
                "taskType": "tts",
                "config": { "language": { "sourceLanguage": "hi" }, "audioFormat": "wav" },
                "audio": [{ "audioContent": "UklGRg==", "audioUri": null }]
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let body = client.tts("नमस्ते", "hi", Gender::Male, 8_000).await.unwrap();

    assert_eq!(response::decode_audio(&body).unwrap(), b"RIFF");
}

#[tokio::test]
async fn tts_rejects_voice_not_offered() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let result = client.tts("હેલો", "gu", Gender::Male, 8_000).await;

    assert!(matches!(result, Err(PipelineError::UnsupportedVoice { .. })));
}

#[tokio::test]
async fn tts_accepts_listed_voice() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_partial_json(serde_json::json!({
            "pipelineTasks": [{ "config": { "serviceId": "tts-gu", "gender": "female" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.tts("હેલો વર્લ્ડ", "gu", Gender::Female, 8_000).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn tts_service_follows_configuration_order() {
    let mock_server = MockServer::start().await;

    let mut config = sample_pipeline_config();
    config["pipelineResponseConfig"][2]["config"] = serde_json::json!([
        {
            "serviceId": "tts-hi-first",
            "language": { "sourceLanguage": "hi" },
            "supportedVoices": ["male"]
        },
        {
            "serviceId": "tts-hi",
            "language": { "sourceLanguage": "hi" },
            "supportedVoices": ["female"]
        }
    ]);
    mount_pipeline_config(&mock_server, config).await;
    let client = PipelineClient::connect(test_config(&mock_server)).await.unwrap();

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .and(body_partial_json(serde_json::json!({
            "pipelineTasks": [{ "config": { "serviceId": "tts-hi-first", "gender": "male" } }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.tts("नमस्ते", "hi", Gender::Male, 8_000).await;
    assert!(result.is_ok(), "tts failed: {:?}", result.err());

    // Voices of later entries are not considered
    let result = client.tts("नमस्ते", "hi", Gender::Female, 8_000).await;
    assert!(matches!(result, Err(PipelineError::UnsupportedVoice { .. })));
}

// =============================================================================
// Inference errors
// =============================================================================

#[tokio::test]
async fn inference_error_uses_server_message() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "quota exceeded" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.translate("text", "hi", "gu").await;

    match result {
        Err(PipelineError::Inference { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "quota exceeded");
        },
        other => panic!("expected inference error, got {other:?}"),
    }
}

#[tokio::test]
async fn inference_error_falls_back_to_raw_body() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.asr(b"audio", "hi", AudioFormat::Wav, 16_000).await;

    match result {
        Err(PipelineError::Inference { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        },
        other => panic!("expected inference error, got {other:?}"),
    }
}

#[tokio::test]
async fn inference_error_json_without_message_uses_body() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({ "detail": "bad" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.tts("text", "hi", Gender::Female, 8_000).await;

    match result {
        Err(PipelineError::Inference { message, .. }) => {
            assert!(message.contains("detail"));
        },
        other => panic!("expected inference error, got {other:?}"),
    }
}

#[tokio::test]
async fn success_with_non_json_body_is_invalid_response() {
    let mock_server = MockServer::start().await;
    let client = connected_client(&mock_server).await;

    Mock::given(method("POST"))
        .and(path(INFERENCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = client.translate("text", "hi", "ta").await;

    assert!(matches!(result, Err(PipelineError::InvalidResponse(_))));
}

// =============================================================================
// Property-based tests
// =============================================================================

mod property_tests {
    use integration_bhashini::{LanguageTable, PipelineData, TranslationTable};
    use proptest::prelude::*;
    use secrecy::SecretString;

    use super::*;

    fn offline_client() -> PipelineClient {
        let data = PipelineData::new(
            LanguageTable::new(),
            LanguageTable::new(),
            TranslationTable::new(),
            SecretString::from("k".to_string()),
            "https://cb",
        );
        PipelineClient::from_pipeline_data(PipelineClientConfig::new("user", "key"), data)
            .unwrap()
    }

    proptest! {
        #[test]
        fn unknown_task_types_are_invalid_arguments(task in "[a-zA-Z_]{0,16}") {
            prop_assume!(!["asr", "translation", "tts"].contains(&task.as_str()));

            let result = offline_client().list_available_languages(&task);

            prop_assert!(matches!(result, Err(PipelineError::InvalidArgument(_))));
        }

        #[test]
        fn genders_other_than_male_or_female_are_rejected(gender in "[a-zA-Z]{0,10}") {
            prop_assume!(gender != "male" && gender != "female");

            prop_assert!(matches!(
                gender.parse::<Gender>(),
                Err(PipelineError::InvalidArgument(_))
            ));
        }
    }
}
