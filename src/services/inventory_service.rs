// src/services/inventory_service.rs

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::{OrgState, Shipment, ShipmentItemPayload},
};

// Linha de expedição já saneada, pronta para as duas fases
struct PreparedLine {
    product_id: String,
    quantity: i64,
    price: Option<f64>,
}

#[derive(Clone)]
pub struct InventoryService {
    repo: InventoryRepository,
    pool: SqlitePool,
}

impl InventoryService {
    pub fn new(repo: InventoryRepository, pool: SqlitePool) -> Self {
        Self { repo, pool }
    }

    fn auto_sku() -> String {
        let hex = Uuid::new_v4().simple().to_string();
        format!("AUTO-{}", hex[..4].to_uppercase())
    }

    // ---
    // Snapshot
    // ---
    // O estado inteiro da organização, sempre. Mais novo primeiro.
    pub async fn state(&self, org_id: &str) -> Result<OrgState, AppError> {
        let products = self.repo.list_products(org_id).await?;
        let receipts = self.repo.list_receipts(org_id).await?;

        let mut shipments = Vec::new();
        for row in self.repo.list_shipments(org_id).await? {
            let items = self.repo.list_shipment_items(&row.id).await?;
            shipments.push(Shipment {
                id: row.id,
                created_at: row.created_at,
                items,
            });
        }

        Ok(OrgState {
            products,
            receipts,
            shipments,
        })
    }

    // ---
    // Produtos
    // ---

    // Estoque inicial nunca fica "solto": se vier > 0, nasce junto um
    // recebimento sintético na mesma transação.
    pub async fn create_product(
        &self,
        org_id: &str,
        name: &str,
        sku: Option<&str>,
        unit: Option<&str>,
        price: f64,
        stock: i64,
        purchase_price: f64,
    ) -> Result<OrgState, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "O nome do produto é obrigatório.".to_string(),
            ));
        }

        let sku = match sku.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => Self::auto_sku(),
        };
        let unit = match unit.map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => "un".to_string(),
        };

        let price = price.max(0.0);
        let stock = stock.max(0);
        let purchase_price = purchase_price.max(0.0);

        let mut tx = self.pool.begin().await?;

        let product = self
            .repo
            .insert_product(
                &mut tx,
                org_id,
                name,
                &sku,
                &unit,
                price,
                stock,
                purchase_price,
            )
            .await?;

        if stock > 0 {
            self.repo
                .insert_receipt(&mut tx, org_id, &product.id, stock, purchase_price)
                .await?;
        }

        tx.commit().await?;

        self.state(org_id).await
    }

    pub async fn update_product_price(
        &self,
        org_id: &str,
        product_id: &str,
        price: f64,
    ) -> Result<OrgState, AppError> {
        let mut tx = self.pool.begin().await?;
        let rows = self
            .repo
            .update_product_price(&mut tx, org_id, product_id, price.max(0.0))
            .await?;
        if rows == 0 {
            return Err(AppError::ProductNotFound);
        }
        tx.commit().await?;

        self.state(org_id).await
    }

    pub async fn update_product(
        &self,
        org_id: &str,
        product_id: &str,
        name: &str,
        price: f64,
    ) -> Result<OrgState, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput(
                "O nome do produto é obrigatório.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let rows = self
            .repo
            .update_product(&mut tx, org_id, product_id, name, price.max(0.0))
            .await?;
        if rows == 0 {
            return Err(AppError::ProductNotFound);
        }
        tx.commit().await?;

        self.state(org_id).await
    }

    // O produto sai com seus recebimentos e itens de expedição (cascata);
    // na sequência, expedições que ficaram ocas são varridas. Tudo em uma
    // transação.
    pub async fn delete_product(&self, org_id: &str, product_id: &str) -> Result<OrgState, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = self.repo.delete_product(&mut tx, org_id, product_id).await?;
        if rows == 0 {
            return Err(AppError::ProductNotFound);
        }
        self.repo.sweep_empty_shipments(&mut tx, org_id).await?;

        tx.commit().await?;

        self.state(org_id).await
    }

    // ---
    // Recebimentos
    // ---

    pub async fn create_receipt(
        &self,
        org_id: &str,
        product_id: &str,
        quantity: i64,
        cost: f64,
    ) -> Result<OrgState, AppError> {
        let product_id = product_id.trim();
        if product_id.is_empty() || quantity <= 0 {
            return Err(AppError::InvalidInput(
                "Dados de recebimento inválidos.".to_string(),
            ));
        }
        let cost = cost.max(0.0);

        let mut tx = self.pool.begin().await?;

        if self
            .repo
            .find_product(&mut tx, org_id, product_id)
            .await?
            .is_none()
        {
            return Err(AppError::ProductNotFound);
        }

        self.repo
            .apply_receipt_to_product(&mut tx, org_id, product_id, quantity, cost)
            .await?;
        self.repo
            .insert_receipt(&mut tx, org_id, product_id, quantity, cost)
            .await?;

        tx.commit().await?;

        self.state(org_id).await
    }

    pub async fn delete_receipt(&self, org_id: &str, receipt_id: &str) -> Result<OrgState, AppError> {
        let mut tx = self.pool.begin().await?;

        let receipt = self
            .repo
            .find_receipt(&mut tx, org_id, receipt_id)
            .await?
            .ok_or(AppError::ReceiptNotFound)?;

        self.repo
            .revert_receipt_from_product(&mut tx, org_id, &receipt.product_id, receipt.quantity)
            .await?;
        self.repo.delete_receipt(&mut tx, org_id, receipt_id).await?;

        tx.commit().await?;

        self.state(org_id).await
    }

    // ---
    // Expedições
    // ---

    // Duas fases na MESMA transação: primeiro valida cada linha (produto
    // existe na organização, saldo cobre a quantidade) sem escrever nada;
    // só então grava cabeçalho, baixas e itens. Nenhuma expedição parcial
    // é observável.
    pub async fn create_shipment(
        &self,
        org_id: &str,
        items: &[ShipmentItemPayload],
    ) -> Result<OrgState, AppError> {
        if items.is_empty() {
            return Err(AppError::InvalidInput(
                "Adicione pelo menos uma posição.".to_string(),
            ));
        }

        let mut prepared = Vec::with_capacity(items.len());
        for item in items {
            let product_id = item.product_id.trim();
            if product_id.is_empty() || item.quantity <= 0 {
                return Err(AppError::InvalidInput(
                    "Posição de expedição inválida.".to_string(),
                ));
            }
            prepared.push(PreparedLine {
                product_id: product_id.to_string(),
                quantity: item.quantity,
                price: item.price.map(|p| p.max(0.0)),
            });
        }

        let mut tx = self.pool.begin().await?;

        // Fase 1: checa tudo, não escreve nada
        let mut lines = Vec::with_capacity(prepared.len());
        for line in &prepared {
            let product = self
                .repo
                .find_product(&mut tx, org_id, &line.product_id)
                .await?
                .ok_or(AppError::ProductNotFound)?;
            if product.stock < line.quantity {
                return Err(AppError::InsufficientStock);
            }
            let price = line.price.unwrap_or(product.price);
            lines.push((line.product_id.clone(), line.quantity, price));
        }

        // Fase 2: grava. A baixa é guardada por `stock >= ?`; se um
        // gravador concorrente levou o saldo entre as fases, a transação
        // inteira volta atrás.
        let shipment = self.repo.insert_shipment(&mut tx, org_id).await?;
        for (product_id, quantity, price) in &lines {
            let rows = self
                .repo
                .decrement_stock_guarded(&mut tx, org_id, product_id, *quantity)
                .await?;
            if rows == 0 {
                return Err(AppError::InsufficientStock);
            }
            let amount = price * (*quantity as f64);
            self.repo
                .insert_shipment_item(
                    &mut tx,
                    &shipment.id,
                    org_id,
                    product_id,
                    *quantity,
                    *price,
                    amount,
                )
                .await?;
        }

        tx.commit().await?;

        self.state(org_id).await
    }

    // Devolve cada quantidade ao produto correspondente (produto apagado:
    // a devolução daquele item é um no-op) e apaga cabeçalho + itens.
    pub async fn delete_shipment(
        &self,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<OrgState, AppError> {
        let mut tx = self.pool.begin().await?;

        if self
            .repo
            .find_shipment(&mut tx, org_id, shipment_id)
            .await?
            .is_none()
        {
            return Err(AppError::ShipmentNotFound);
        }

        let items = self
            .repo
            .items_for_shipment(&mut tx, org_id, shipment_id)
            .await?;
        for item in &items {
            self.repo
                .restore_stock(&mut tx, org_id, &item.product_id, item.quantity)
                .await?;
        }
        self.repo.delete_shipment(&mut tx, org_id, shipment_id).await?;

        tx.commit().await?;

        self.state(org_id).await
    }
}
