// tests/api.rs
//
// Teste caixa-preta: sobe o app de produção numa porta efêmera, com banco
// em memória, e dirige tudo por HTTP com cookies de sessão reais.

use std::str::FromStr;

use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use estoque_backend::build_app;
use estoque_backend::config::AppState;
use estoque_backend::db::{MembershipRepository, OrganizationRepository, UserRepository};
use estoque_backend::models::rbac::Role;

struct TestServer {
    base_url: String,
    state: AppState,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("opções do SQLite em memória")
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .expect("falha ao abrir o banco em memória");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("falha ao aplicar as migrações");

        let state = AppState::from_pool(pool);

        // O mesmo router de produção, numa porta efêmera
        let app = build_app(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            state,
            handle,
        }
    }

    // Semeia usuário + vínculo direto pelos repositórios (bcrypt custo 4,
    // o mínimo, para o teste não se arrastar)
    async fn seed_user(&self, org_id: &str, name: &str, role: Role) {
        let user_repo = UserRepository::new(self.state.db_pool.clone());
        let membership_repo = MembershipRepository::new(self.state.db_pool.clone());
        let hash = bcrypt::hash("senha123", 4).unwrap();

        let mut tx = self.state.db_pool.begin().await.unwrap();
        let user = user_repo
            .create_user(&mut tx, name, &format!("{}@local", name), &hash)
            .await
            .unwrap();
        membership_repo
            .add_member(&mut tx, &user.id, org_id, role)
            .await
            .unwrap();
        tx.commit().await.unwrap();
    }

    async fn seed_org(&self, name: &str, code: &str) -> String {
        let org_repo = OrganizationRepository::new(self.state.db_pool.clone());
        let mut tx = self.state.db_pool.begin().await.unwrap();
        let org = org_repo
            .create_organization(&mut tx, name, code)
            .await
            .unwrap();
        tx.commit().await.unwrap();
        org.id
    }

    // Cliente com cookie store próprio, já logado como `name`
    async fn login(&self, name: &str) -> reqwest::Client {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .unwrap();
        let res = client
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&json!({ "username": name, "password": "senha123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        client
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn rotas_protegidas_exigem_sessao() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "UNAUTHENTICATED");

    // Senha errada também é 401, não 500
    let org = srv.seed_org("Org Login", "LOGN01").await;
    srv.seed_user(&org, "dono", Role::Owner).await;
    let res = client
        .post(format!("{}/api/auth/login", srv.base_url))
        .json(&json!({ "username": "dono", "password": "errada" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn fluxo_completo_do_livro_de_estoque() {
    let srv = TestServer::spawn().await;
    let org = srv.seed_org("Loja Fluxo", "FLUX01").await;
    srv.seed_user(&org, "gerente", Role::Manager).await;
    let client = srv.login("gerente").await;

    // Organização nasce vazia
    let res = client
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 0);
    assert_eq!(body["me"]["role"], "manager");

    // Produto com estoque inicial 10: nasce com recebimento casado
    let res = client
        .post(format!("{}/api/products", srv.base_url))
        .json(&json!({
            "name": "Parafuso",
            "price": 10.0,
            "stock": 10,
            "purchasePrice": 100.0
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let product_id = body["products"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["products"][0]["stock"], 10);
    assert_eq!(body["receipts"][0]["quantity"], 10);
    assert_eq!(body["receipts"][0]["cost"], 100.0);

    // Expedição de 4: sobra 6
    let res = client
        .post(format!("{}/api/shipments", srv.base_url))
        .json(&json!({ "items": [{ "productId": product_id, "quantity": 4 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"][0]["stock"], 6);
    let shipment_id = body["shipments"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(body["shipments"][0]["items"][0]["amount"], 40.0);

    // Expedição maior que o saldo: 409, nada muda
    let res = client
        .post(format!("{}/api/shipments", srv.base_url))
        .json(&json!({ "items": [{ "productId": product_id, "quantity": 100 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "INSUFFICIENT_STOCK");

    // Documento imprimível
    let res = client
        .get(format!(
            "{}/api/shipments/{}/print",
            srv.base_url, shipment_id
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["productName"], "Parafuso");
    assert_eq!(body["total"], 40.0);
    assert_eq!(body["orgName"], "Loja Fluxo");

    // Desfazer a expedição devolve o estoque exato
    let res = client
        .delete(format!("{}/api/shipments/{}", srv.base_url, shipment_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"][0]["stock"], 10);
    assert_eq!(body["shipments"].as_array().unwrap().len(), 0);

    // Logout encerra a sessão de verdade
    let res = client
        .post(format!("{}/api/auth/logout", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn papeis_sao_aplicados_por_operacao() {
    let srv = TestServer::spawn().await;
    let org = srv.seed_org("Loja Papéis", "ROLE01").await;
    srv.seed_user(&org, "dona", Role::Owner).await;
    srv.seed_user(&org, "chefe", Role::Manager).await;
    srv.seed_user(&org, "olheiro", Role::Viewer).await;

    let viewer = srv.login("olheiro").await;
    let manager = srv.login("chefe").await;
    let owner = srv.login("dona").await;

    // Viewer lê, mas não escreve
    let res = viewer
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = viewer
        .post(format!("{}/api/products", srv.base_url))
        .json(&json!({ "name": "Proibido" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "FORBIDDEN");

    let res = viewer
        .post(format!("{}/api/shipments", srv.base_url))
        .json(&json!({ "items": [{ "productId": "p_x", "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Manager escreve no livro, mas não mexe em papéis
    let res = manager
        .post(format!("{}/api/products", srv.base_url))
        .json(&json!({ "name": "Permitido" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = manager
        .post(format!("{}/api/memberships/role", srv.base_url))
        .json(&json!({ "email": "olheiro@local", "role": "manager" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Dono promove o viewer; a promoção vale na requisição seguinte,
    // sem novo login
    let res = owner
        .post(format!("{}/api/memberships/role", srv.base_url))
        .json(&json!({ "email": "olheiro@local", "role": "manager" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = viewer
        .post(format!("{}/api/products", srv.base_url))
        .json(&json!({ "name": "Agora pode" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn organizacoes_sao_estanques_por_http() {
    let srv = TestServer::spawn().await;
    let org_a = srv.seed_org("Org A", "ESTQ0A").await;
    let org_b = srv.seed_org("Org B", "ESTQ0B").await;
    srv.seed_user(&org_a, "alice", Role::Owner).await;
    srv.seed_user(&org_b, "bruno", Role::Owner).await;

    let alice = srv.login("alice").await;
    let bruno = srv.login("bruno").await;

    let res = alice
        .post(format!("{}/api/products", srv.base_url))
        .json(&json!({ "name": "Da Alice", "stock": 5, "purchasePrice": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let product_a = body["products"][0]["id"].as_str().unwrap().to_string();

    // Bruno não enxerga nem alcança nada da Alice: id válido de outra
    // organização responde como se não existisse
    let res = bruno
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 0);

    let res = bruno
        .delete(format!("{}/api/products/{}", srv.base_url, product_a))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = bruno
        .post(format!("{}/api/shipments", srv.base_url))
        .json(&json!({ "items": [{ "productId": product_a, "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // O produto da Alice segue intacto
    let res = alice
        .get(format!("{}/api/state", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"][0]["stock"], 5);
}
