use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GrocyConfig;
use crate::error::ImportError;
use crate::grocy::{GrocyApi, NewProduct, NewRecipe, RecipePosition};
use crate::model::{grocy_id, Product, QuantityUnit};

const API_KEY_HEADER: &str = "grocy-api-key";

#[derive(Deserialize)]
struct Created {
    #[serde(deserialize_with = "grocy_id")]
    created_object_id: u64,
}

pub struct GrocyClient {
    client: Client,
    base_url: String,
    location_id: u64,
}

impl GrocyClient {
    /// Create a client from configuration
    pub fn new(config: &GrocyConfig) -> Result<Self, ImportError> {
        let client = Self::http_client(&config.api_key, Duration::from_secs(config.timeout))?;
        Ok(GrocyClient {
            client,
            base_url: config.base_url(),
            location_id: config.location_id,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: &str, base_url: String) -> Result<Self, ImportError> {
        Ok(GrocyClient {
            client: Self::http_client(api_key, Duration::from_secs(30))?,
            base_url,
            location_id: 1,
        })
    }

    fn http_client(api_key: &str, timeout: Duration) -> Result<Client, ImportError> {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(api_key)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ImportError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }

    async fn create<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<u64, ImportError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = check(response).await?;
        let text = response.text().await?;
        debug!("POST {} -> {}", path, text);
        let created: Created = serde_json::from_str(&text).map_err(|e| {
            ImportError::UnexpectedResponse(format!("{} (body: {})", e, text))
        })?;
        Ok(created.created_object_id)
    }
}

/// Turn a non-success status into an error carrying the response body.
async fn check(response: Response) -> Result<Response, ImportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ImportError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl GrocyApi for GrocyClient {
    async fn list_products(&self) -> Result<Vec<Product>, ImportError> {
        self.get("objects/products").await
    }

    async fn list_units(&self) -> Result<Vec<QuantityUnit>, ImportError> {
        self.get("objects/quantity_units").await
    }

    async fn create_product(&self, name: &str, default_unit_id: u64) -> Result<u64, ImportError> {
        let product = NewProduct {
            name: name.to_string(),
            location_id: self.location_id,
            qu_id_purchase: default_unit_id,
            qu_id_stock: default_unit_id,
            qu_id_consume: default_unit_id,
            qu_id_price: default_unit_id,
        };
        let id = self.create("objects/products", &product).await?;
        info!("Created product \"{}\" ({})", name, id);
        Ok(id)
    }

    async fn create_recipe(&self, recipe: &NewRecipe) -> Result<u64, ImportError> {
        let id = self.create("objects/recipes", recipe).await?;
        info!("Created recipe \"{}\" ({})", recipe.name, id);
        Ok(id)
    }

    async fn delete_recipe(&self, recipe_id: u64) -> Result<(), ImportError> {
        let response = self
            .client
            .delete(self.url(&format!("objects/recipes/{}", recipe_id)))
            .send()
            .await?;
        check(response).await?;
        info!("Deleted recipe {}", recipe_id);
        Ok(())
    }

    async fn link_ingredient(&self, position: &RecipePosition) -> Result<u64, ImportError> {
        self.create("objects/recipes_pos", position).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_list_products() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/objects/products")
            .match_header("grocy-api-key", "fake_api_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id": 1, "name": "Flour", "location_id": 2}, {"id": "2", "name": "Salt"}]"#,
            )
            .create_async()
            .await;

        let client = GrocyClient::with_base_url("fake_api_key", server.url()).unwrap();
        let products = client.list_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Flour");
        assert_eq!(products[1].id, 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_recipe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/objects/recipes")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "name": "Pancakes",
                "base_servings": 4,
                "desired_servings": 4
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"created_object_id": 12}"#)
            .create_async()
            .await;

        let client = GrocyClient::with_base_url("fake_api_key", server.url()).unwrap();
        let id = client
            .create_recipe(&NewRecipe::new("Pancakes", "<p>Mix</p>", 4))
            .await
            .unwrap();

        assert_eq!(id, 12);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/objects/recipes_pos")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error_message": "Invalid product"}"#)
            .create_async()
            .await;

        let client = GrocyClient::with_base_url("fake_api_key", server.url()).unwrap();
        let position = RecipePosition {
            recipe_id: 1,
            product_id: 2,
            qu_id: 3,
            amount: 1.0,
            note: None,
            ingredient_group: None,
            price_factor: 1.0,
        };
        let result = client.link_ingredient(&position).await;

        match result {
            Err(ImportError::Api { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid product"));
            }
            other => panic!("expected an API error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_created_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/objects/products")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = GrocyClient::with_base_url("fake_api_key", server.url()).unwrap();
        let result = client.create_product("Saffron", 3).await;
        assert!(matches!(result, Err(ImportError::UnexpectedResponse(_))));
    }

    #[tokio::test]
    async fn test_delete_recipe() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/objects/recipes/12")
            .with_status(204)
            .create_async()
            .await;

        let client = GrocyClient::with_base_url("fake_api_key", server.url()).unwrap();
        client.delete_recipe(12).await.unwrap();
        mock.assert_async().await;
    }
}
