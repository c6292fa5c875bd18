use fake::{faker::lorem::en::Word, Fake};

use crate::helpers::spawn_input_app;

#[tokio::test]
async fn unknown_route_returns_json_404() {
    // Arrange
    let app = spawn_input_app("http://127.0.0.1:9")
        .await
        .expect("Failed to spawn app.");
    let random_path: String = Word().fake();
    let url = format!("{}/unknown-{}", &app.address, random_path);

    // Act
    let response = app
        .client
        .get(url)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
    let body = response
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse response");
    assert_eq!(body["message"], "Not Found");
}

#[tokio::test]
async fn wrong_method_on_weather_is_not_served() {
    // Arrange
    let app = spawn_input_app("http://127.0.0.1:9")
        .await
        .expect("Failed to spawn app.");

    // Act
    let response = app
        .client
        .get(format!("{}/weather", &app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(response.status().as_u16(), 405);
}
