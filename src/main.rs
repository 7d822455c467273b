// src/main.rs

use estoque_backend::{build_app, config::AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Inicializa o logger antes de qualquer coisa
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é intencional aqui: se a configuração falhar, a aplicação
    // não deve subir.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Aplica as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante a conta administrativa e a organização padrão
    app_state
        .tenancy_service
        .bootstrap_admin()
        .await
        .expect("Falha no bootstrap da conta administrativa.");

    let app = build_app(app_state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
