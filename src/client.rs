// src/client.rs
//
// Cliente HTTP tipado da API. Substitui o token e o carrinho que o navegador
// guardava soltos: aqui a sessão e o carrinho são valores explícitos.

pub mod cart;
pub mod session;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use uuid::Uuid;

use crate::{
    models::{
        admin::DashboardResponse,
        auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, Role},
        chat::{ChatbotPayload, ConversationPartner},
        delivery::DeliveryListing,
        order::{Order, OrderRow},
        product::{Product, ProductListing},
        supplier::SupplierProduct,
    },
    services::chatbot::{ChatLanguage, ChatbotReply},
};

pub use cart::{Cart, CartLine};
pub use session::Session;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Falha na comunicação com o servidor: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error("É preciso fazer login")]
    NotAuthenticated,

    #[error("Apenas compradores podem adicionar produtos ao carrinho")]
    NotABuyer,

    #[error("Carrinho vazio")]
    EmptyCart,
}

/// Painel inicial de cada perfil, com os dados que ele carrega.
#[derive(Debug, Clone)]
pub enum Dashboard {
    Farmer { products: Vec<Product> },
    Buyer { orders: Vec<OrderRow> },
    Transporter { deliveries: Vec<DeliveryListing> },
    Supplier { products: Vec<SupplierProduct> },
    Admin(DashboardResponse),
}

impl Dashboard {
    /// Rota (relativa a `/api`) que alimenta o painel do perfil.
    pub fn source_path(role: Role) -> &'static str {
        match role {
            Role::Agricultor => "/products/mine",
            Role::Comprador => "/orders",
            Role::Transportador => "/transport/my-deliveries",
            Role::Fornecedor => "/supplier/my-products",
            Role::Admin => "/admin/dashboard",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct ProductsEnvelope<T> {
    products: Vec<T>,
}

#[derive(Deserialize)]
struct ProductEnvelope {
    product: ProductListing,
}

#[derive(Deserialize)]
struct OrdersEnvelope {
    orders: Vec<OrderRow>,
}

#[derive(Deserialize)]
struct OrderEnvelope {
    order: Order,
}

#[derive(Deserialize)]
struct ConversationsEnvelope {
    conversations: Vec<ConversationPartner>,
}

#[derive(Deserialize)]
struct DeliveriesEnvelope {
    deliveries: Vec<DeliveryListing>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
    cart: Cart,
}

impl ApiClient {
    /// `base_url` aponta para a raiz da API, por exemplo `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Usa um `reqwest::Client` já configurado (proxy, timeouts...).
    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
            cart: Cart::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub async fn register(&mut self, payload: &RegisterUserPayload) -> Result<&Session, ClientError> {
        let response: AuthResponse = self.send(self.request(Method::POST, "/auth/register").json(payload)).await?;
        Ok(self.session.insert(Session::from(response)))
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ClientError> {
        let body = LoginUserPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: AuthResponse = self.send(self.request(Method::POST, "/auth/login").json(&body)).await?;
        Ok(self.session.insert(Session::from(response)))
    }

    /// Esquece o token e o carrinho.
    pub fn logout(&mut self) {
        self.session = None;
        self.cart.clear();
    }

    pub async fn products(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<ProductListing>, ClientError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.push(("search", search));
        }
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            query.push(("category", category));
        }

        let envelope: ProductsEnvelope<ProductListing> =
            self.send(self.request(Method::GET, "/products").query(&query)).await?;
        Ok(envelope.products)
    }

    pub async fn product(&self, id: Uuid) -> Result<ProductListing, ClientError> {
        let envelope: ProductEnvelope = self
            .send(self.request(Method::GET, &format!("/products/{id}")))
            .await?;
        Ok(envelope.product)
    }

    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), ClientError> {
        match &self.session {
            Some(session) if session.is_buyer() => {
                self.cart.add(product);
                Ok(())
            }
            Some(_) => Err(ClientError::NotABuyer),
            None => Err(ClientError::NotAuthenticated),
        }
    }

    /// Envia o carrinho como pedido. O carrinho só é esvaziado se o servidor aceitar.
    pub async fn checkout(
        &mut self,
        payment_method: Option<String>,
        delivery_address: Option<String>,
    ) -> Result<Order, ClientError> {
        if self.cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        let payload = self.cart.to_order(payment_method, delivery_address);
        let envelope: OrderEnvelope = self
            .send(self.authorized(Method::POST, "/orders")?.json(&payload))
            .await?;
        self.cart.clear();
        Ok(envelope.order)
    }

    /// Assistente público; sem idioma, o servidor usa o `Accept-Language` ou o português.
    pub async fn chatbot(
        &self,
        message: &str,
        language: Option<ChatLanguage>,
    ) -> Result<ChatbotReply, ClientError> {
        let payload = ChatbotPayload {
            message: message.to_string(),
            language: language.map(|l| l.code().to_string()),
        };
        self.send(self.request(Method::POST, "/chat/chatbot").json(&payload))
            .await
    }

    pub async fn conversations(&self) -> Result<Vec<ConversationPartner>, ClientError> {
        let envelope: ConversationsEnvelope = self
            .send(self.authorized(Method::GET, "/chat/conversations")?)
            .await?;
        Ok(envelope.conversations)
    }

    pub async fn dashboard(&self) -> Result<Dashboard, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotAuthenticated)?;
        let request = self.authorized(Method::GET, Dashboard::source_path(session.role()))?;

        let dashboard = match session.role() {
            Role::Agricultor => {
                let envelope: ProductsEnvelope<Product> = self.send(request).await?;
                Dashboard::Farmer { products: envelope.products }
            }
            Role::Comprador => {
                let envelope: OrdersEnvelope = self.send(request).await?;
                Dashboard::Buyer { orders: envelope.orders }
            }
            Role::Transportador => {
                let envelope: DeliveriesEnvelope = self.send(request).await?;
                Dashboard::Transporter { deliveries: envelope.deliveries }
            }
            Role::Fornecedor => {
                let envelope: ProductsEnvelope<SupplierProduct> = self.send(request).await?;
                Dashboard::Supplier { products: envelope.products }
            }
            Role::Admin => Dashboard::Admin(self.send(request).await?),
        };
        Ok(dashboard)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotAuthenticated)?;
        Ok(self.request(method, path).bearer_auth(&session.token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Erro desconhecido").to_string(),
            };
            return Err(ClientError::Api { status, message });
        }

        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{auth::UserSummary, product::ProductStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn logged_in(role: Role) -> ApiClient {
        let mut client = ApiClient::new("http://localhost:3000/api/");
        client.session = Some(Session {
            token: "token".into(),
            user: UserSummary {
                id: Uuid::new_v4(),
                email: "teste@exemplo.co.mz".into(),
                full_name: "Teste".into(),
                user_type: role,
                language: "pt".into(),
            },
        });
        client
    }

    fn tomate() -> Product {
        Product {
            id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            name: "Tomate".into(),
            description: None,
            category: Some("hortaliças".into()),
            price: Decimal::from(40),
            quantity: Decimal::from(10),
            unit: "kg".into(),
            harvest_date: None,
            photo_url: None,
            status: ProductStatus::Disponivel,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn each_role_has_its_own_dashboard_source() {
        assert_eq!(Dashboard::source_path(Role::Agricultor), "/products/mine");
        assert_eq!(Dashboard::source_path(Role::Comprador), "/orders");
        assert_eq!(Dashboard::source_path(Role::Transportador), "/transport/my-deliveries");
        assert_eq!(Dashboard::source_path(Role::Fornecedor), "/supplier/my-products");
        assert_eq!(Dashboard::source_path(Role::Admin), "/admin/dashboard");
    }

    #[test]
    fn base_url_loses_the_trailing_slash() {
        assert_eq!(ApiClient::new("http://localhost:3000/api/").base_url, "http://localhost:3000/api");
    }

    #[test]
    fn only_buyers_fill_the_cart() {
        let mut anonymous = ApiClient::new("http://localhost:3000/api");
        assert!(matches!(anonymous.add_to_cart(&tomate()), Err(ClientError::NotAuthenticated)));

        let mut farmer = logged_in(Role::Agricultor);
        assert!(matches!(farmer.add_to_cart(&tomate()), Err(ClientError::NotABuyer)));
        assert!(farmer.cart().is_empty());

        let mut buyer = logged_in(Role::Comprador);
        buyer.add_to_cart(&tomate()).unwrap();
        assert_eq!(buyer.cart().lines().len(), 1);
    }

    #[test]
    fn logout_forgets_session_and_cart() {
        let mut buyer = logged_in(Role::Comprador);
        buyer.add_to_cart(&tomate()).unwrap();
        buyer.logout();
        assert!(buyer.session().is_none());
        assert!(buyer.cart().is_empty());
    }

    #[tokio::test]
    async fn empty_cart_is_refused_before_any_request() {
        let mut buyer = logged_in(Role::Comprador);
        let result = buyer.checkout(Some("mpesa".into()), None).await;
        assert!(matches!(result, Err(ClientError::EmptyCart)));
    }

    // Servidor real em porta efêmera; o pool é preguiçoso e o chatbot não toca no banco
    async fn spawn_api() -> String {
        use crate::config::{AppState, Config};
        use sqlx::postgres::PgPoolOptions;

        let config = Config {
            database_url: "postgres://localhost/agro_test".into(),
            jwt_secret: "segredo-de-teste".into(),
            port: 0,
            public_dir: "public".into(),
            database_max_connections: 1,
        };
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        let app = crate::routes::api_router(AppState::with_pool(pool, config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api")
    }

    #[tokio::test]
    async fn chatbot_answers_in_the_requested_language() {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = ApiClient::with_http_client(spawn_api().await, http);

        let reply = client.chatbot("what's the weather?", Some(ChatLanguage::En)).await.unwrap();
        assert_eq!(reply.language, ChatLanguage::En);
        assert_eq!(reply.response, "You can check weather alerts in your region.");

        let reply = client.chatbot("olá", None).await.unwrap();
        assert_eq!(reply.language, ChatLanguage::Pt);
    }

    #[tokio::test]
    async fn conversations_require_a_session() {
        let client = ApiClient::new("http://localhost:3000/api");
        assert!(matches!(client.conversations().await, Err(ClientError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn dashboard_requires_a_session() {
        let client = ApiClient::new("http://localhost:3000/api");
        assert!(matches!(client.dashboard().await, Err(ClientError::NotAuthenticated)));
    }
}
