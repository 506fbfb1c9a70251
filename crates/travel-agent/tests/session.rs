use chrono::DateTime;
use serde_json::{Value, json};
use travel_agent::SessionBuilder;
use travel_agent::plan::Stage;
use travel_agent_model::{ModelMessage, ToolCallRequest};
use travel_agent_search::SearchConfigBuilder;
use travel_agent_test_model::{PresetResponse, TestModelProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn call(id: &str, name: &str, arguments: Value) -> ToolCallRequest {
    ToolCallRequest {
        id: id.to_owned(),
        name: name.to_owned(),
        arguments,
    }
}

fn search_flights_call() -> ToolCallRequest {
    call(
        "call_flights",
        "search_flights",
        json!({
            "departure_id": "JFK",
            "arrival_id": "CDG",
            "departure_date": "2025-06-01",
            "return_date": "2025-06-10",
        }),
    )
}

fn search_hotels_call() -> ToolCallRequest {
    call(
        "call_hotels",
        "search_hotels",
        json!({
            "destination": "Paris",
            "type": "Hotels",
            "check_in_date": "2025-06-01",
            "check_out_date": "2025-06-10",
            "adults": 2,
        }),
    )
}

fn system_prompt(messages: &[ModelMessage]) -> &str {
    match messages.first() {
        Some(ModelMessage::System(prompt)) => prompt,
        other => panic!("expected a system prompt, got {other:?}"),
    }
}

fn tool_result<'a>(messages: &'a [ModelMessage], id: &str) -> &'a str {
    messages
        .iter()
        .find_map(|msg| match msg {
            ModelMessage::Tool(result) if result.id == id => {
                Some(result.content.as_str())
            }
            _ => None,
        })
        .unwrap()
}

async fn mount_search(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google_flights"))
        .and(query_param("outbound_date", "2025-06-01"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "best_flights": [{
                "flights": [{
                    "departure_airport": {
                        "name": "John F. Kennedy International Airport",
                        "time": "2025-06-01 18:30"
                    },
                    "arrival_airport": {
                        "name": "Paris Charles de Gaulle Airport",
                        "time": "2025-06-02 07:45"
                    },
                    "duration": 435,
                    "airline": "Air France",
                    "flight_number": "AF 7"
                }]
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google_hotels"))
        .and(query_param("q", "Paris Hotels"))
        .and(query_param("adults", "2"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [{
                "name": "Hôtel des Grands Boulevards",
                "rate_per_night": { "lowest": "$310" },
                "overall_rating": 4.5
            }]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_plan_a_trip() {
    let server = MockServer::start().await;
    mount_search(&server).await;

    let mut model_provider = TestModelProvider::default();
    model_provider.add_assistant_step(PresetResponse::with_message(
        "Where are you flying from, and when?",
    ));
    model_provider.add_assistant_step(PresetResponse::with_tool_calls([
        search_flights_call(),
        search_hotels_call(),
    ]));
    model_provider.add_assistant_step(PresetResponse::with_message(
        "## Your trip to Paris\n- Fly **AF 7** on June 1",
    ));

    let search_config = SearchConfigBuilder::with_api_key("test-key")
        .with_base_url(server.uri())
        .build();
    let mut session = SessionBuilder::with_model_provider(
        model_provider.clone(),
        search_config,
    )
    .with_current_datetime(
        DateTime::parse_from_rfc3339("2025-05-20T09:30:00+02:00").unwrap(),
    )
    .build();

    let turn = session.send_message("I want to visit Paris").await.unwrap();
    assert_eq!(turn.reply, "Where are you flying from, and when?");
    assert_eq!(session.plan().current_stage(), Stage::CollectPreferences);

    let turn = session
        .send_message("From New York, June 1 to June 10, two adults")
        .await
        .unwrap();
    assert!(turn.reply.starts_with("## Your trip to Paris"));
    assert_eq!(turn.tool_calls.len(), 2);
    assert!(turn.tool_calls.iter().all(|call| call.result.is_ok()));
    assert_eq!(session.plan().current_stage(), Stage::Complete);

    let requests = model_provider.requests();
    assert_eq!(requests.len(), 3);

    let first_prompt = system_prompt(&requests[0].messages);
    assert!(first_prompt.contains("1. Start by asking the user"));
    assert!(
        first_prompt.contains("Tuesday, May 20, 2025 09:30 (UTC+02:00)")
    );
    assert!(first_prompt.contains("○ preferences"));

    let tool_names: Vec<_> =
        requests[0].tools.iter().map(|tool| tool.name.as_str()).collect();
    assert_eq!(tool_names, ["search_flights", "search_hotels"]);

    let messages = &requests[2].messages;
    let flights: Value =
        serde_json::from_str(tool_result(messages, "call_flights")).unwrap();
    assert_eq!(flights[0]["flight_number"], "AF 7");
    assert_eq!(flights[0]["airplane"], Value::Null);
    let hotels: Value =
        serde_json::from_str(tool_result(messages, "call_hotels")).unwrap();
    assert_eq!(hotels[0]["rate_per_night"], "$310");
    assert_eq!(hotels[0]["latitude"], Value::Null);
}

#[tokio::test]
async fn test_search_failure_is_reported_to_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("Too many searches"),
        )
        .mount(&server)
        .await;

    let mut model_provider = TestModelProvider::default();
    model_provider
        .add_assistant_step(PresetResponse::with_tool_calls([search_flights_call()]));
    model_provider.add_assistant_step(PresetResponse::with_message(
        "The flight search is busy, let's try again later.",
    ));

    let search_config = SearchConfigBuilder::with_api_key("test-key")
        .with_base_url(server.uri())
        .build();
    let mut session =
        SessionBuilder::with_model_provider(model_provider.clone(), search_config)
            .build();

    let turn = session.send_message("Flights JFK to CDG").await.unwrap();
    assert!(turn.tool_calls[0].result.is_err());
    assert_eq!(session.plan().current_stage(), Stage::CollectPreferences);

    let requests = model_provider.requests();
    let content = tool_result(&requests[1].messages, "call_flights");
    assert!(content.starts_with("Error: "));
    assert!(content.contains("429"));
    assert!(content.contains("Too many searches"));
    assert!(!content.contains("test-key"));
}

#[tokio::test]
async fn test_reset() {
    let mut model_provider = TestModelProvider::default();
    model_provider.add_assistant_step(PresetResponse::with_message("Hello!"));

    let search_config = SearchConfigBuilder::with_api_key("test-key").build();
    let mut session =
        SessionBuilder::with_model_provider(model_provider, search_config)
            .build();

    session.send_message("Hi").await.unwrap();
    assert_eq!(session.agent().conversation().len(), 2);
    session.reset();
    assert!(session.agent().conversation().is_empty());

    // The script restarts along with the conversation.
    let turn = session.send_message("Hi again").await.unwrap();
    assert_eq!(turn.reply, "Hello!");
}
