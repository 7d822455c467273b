// src/db/inventory_repo.rs

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    common::error::AppError,
    common::ids::make_id,
    models::inventory::{Product, Receipt, ShipmentItem, ShipmentPrintLine, ShipmentRow},
};

// O repositório do livro de estoque: produtos, recebimentos, expedições.
// Toda consulta filtra por org_id — uma referência de outra organização é
// impossível de construir por aqui.
#[derive(Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras (snapshot)
    // ---
    // Mais novo primeiro; itens de expedição na ordem de inserção.

    pub async fn list_products(&self, org_id: &str) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM org_products WHERE org_id = ? ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    pub async fn list_receipts(&self, org_id: &str) -> Result<Vec<Receipt>, AppError> {
        let receipts = sqlx::query_as::<_, Receipt>(
            "SELECT * FROM org_receipts WHERE org_id = ? ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(receipts)
    }

    pub async fn list_shipments(&self, org_id: &str) -> Result<Vec<ShipmentRow>, AppError> {
        let shipments = sqlx::query_as::<_, ShipmentRow>(
            "SELECT * FROM org_shipments WHERE org_id = ? ORDER BY created_at DESC",
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(shipments)
    }

    pub async fn list_shipment_items(
        &self,
        shipment_id: &str,
    ) -> Result<Vec<ShipmentItem>, AppError> {
        let items = sqlx::query_as::<_, ShipmentItem>(
            "SELECT * FROM org_shipment_items WHERE shipment_id = ? ORDER BY id ASC",
        )
        .bind(shipment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    // Linhas do documento imprimível. LEFT JOIN: um produto apagado vira
    // um nome de reserva, a linha histórica permanece.
    pub async fn shipment_print_lines(
        &self,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<Vec<ShipmentPrintLine>, AppError> {
        let lines = sqlx::query_as::<_, ShipmentPrintLine>(
            r#"
            SELECT COALESCE(p.name, 'Produto removido') AS product_name,
                   i.quantity, i.price, i.amount
            FROM org_shipment_items i
            LEFT JOIN org_products p ON p.id = i.product_id
            WHERE i.shipment_id = ? AND i.org_id = ?
            ORDER BY i.id ASC
            "#,
        )
        .bind(shipment_id)
        .bind(org_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lines)
    }

    // ---
    // Produtos
    // ---

    pub async fn insert_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        name: &str,
        sku: &str,
        unit: &str,
        price: f64,
        stock: i64,
        purchase_price: f64,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO org_products (id, org_id, name, sku, unit, price, stock, purchase_price, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(make_id("p"))
        .bind(org_id)
        .bind(name)
        .bind(sku)
        .bind(unit)
        .bind(price)
        .bind(stock)
        .bind(purchase_price)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(product)
    }

    pub async fn update_product_price(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        price: f64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE org_products SET price = ? WHERE id = ? AND org_id = ?")
            .bind(price)
            .bind(product_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn update_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        name: &str,
        price: f64,
    ) -> Result<u64, AppError> {
        let result =
            sqlx::query("UPDATE org_products SET name = ?, price = ? WHERE id = ? AND org_id = ?")
                .bind(name)
                .bind(price)
                .bind(product_id)
                .bind(org_id)
                .execute(&mut *conn)
                .await?;
        Ok(result.rows_affected())
    }

    // Os recebimentos e itens de expedição do produto caem em cascata (FK)
    pub async fn delete_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM org_products WHERE id = ? AND org_id = ?")
            .bind(product_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    // Apaga expedições que ficaram sem nenhum item: uma "casca" vazia não
    // pode sobreviver à remoção do produto. Mesma transação do delete.
    pub async fn sweep_empty_shipments(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM org_shipments WHERE id IN (
                SELECT s.id
                FROM org_shipments s
                LEFT JOIN org_shipment_items i ON i.shipment_id = s.id
                WHERE s.org_id = ?
                GROUP BY s.id
                HAVING COUNT(i.id) = 0
            )
            "#,
        )
        .bind(org_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn find_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
    ) -> Result<Option<Product>, AppError> {
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM org_products WHERE id = ? AND org_id = ?")
                .bind(product_id)
                .bind(org_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(product)
    }

    // ---
    // Recebimentos
    // ---

    // Entrada de estoque. Custo zero significa "mantém o preço de compra
    // anterior", não "zera" — o CASE resolve isso em um único UPDATE.
    pub async fn apply_receipt_to_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        quantity: i64,
        cost: f64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE org_products
            SET stock = stock + ?,
                purchase_price = CASE WHEN ? > 0 THEN ? ELSE purchase_price END
            WHERE id = ? AND org_id = ?
            "#,
        )
        .bind(quantity)
        .bind(cost)
        .bind(cost)
        .bind(product_id)
        .bind(org_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn insert_receipt(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        quantity: i64,
        cost: f64,
    ) -> Result<Receipt, AppError> {
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            INSERT INTO org_receipts (id, org_id, product_id, quantity, cost, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(make_id("r"))
        .bind(org_id)
        .bind(product_id)
        .bind(quantity)
        .bind(cost)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(receipt)
    }

    pub async fn find_receipt(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        receipt_id: &str,
    ) -> Result<Option<Receipt>, AppError> {
        let receipt =
            sqlx::query_as::<_, Receipt>("SELECT * FROM org_receipts WHERE id = ? AND org_id = ?")
                .bind(receipt_id)
                .bind(org_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(receipt)
    }

    // Reversão incondicional e não-cronológica, travada em zero
    pub async fn revert_receipt_from_product(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE org_products
            SET stock = CASE WHEN stock - ? < 0 THEN 0 ELSE stock - ? END
            WHERE id = ? AND org_id = ?
            "#,
        )
        .bind(quantity)
        .bind(quantity)
        .bind(product_id)
        .bind(org_id)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn delete_receipt(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        receipt_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM org_receipts WHERE id = ? AND org_id = ?")
            .bind(receipt_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    // ---
    // Expedições
    // ---

    pub async fn insert_shipment(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
    ) -> Result<ShipmentRow, AppError> {
        let shipment = sqlx::query_as::<_, ShipmentRow>(
            r#"
            INSERT INTO org_shipments (id, org_id, created_at)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(make_id("s"))
        .bind(org_id)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(shipment)
    }

    // Baixa guardada: só debita se ainda houver saldo. Zero linhas afetadas
    // significa que outro gravador levou as unidades — o chamador aborta a
    // transação inteira.
    pub async fn decrement_stock_guarded(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE org_products
            SET stock = stock - ?
            WHERE id = ? AND org_id = ? AND stock >= ?
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .bind(org_id)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert_shipment_item(
        &self,
        conn: &mut SqliteConnection,
        shipment_id: &str,
        org_id: &str,
        product_id: &str,
        quantity: i64,
        price: f64,
        amount: f64,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO org_shipment_items (shipment_id, org_id, product_id, quantity, price, amount)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(shipment_id)
        .bind(org_id)
        .bind(product_id)
        .bind(quantity)
        .bind(price)
        .bind(amount)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn find_shipment(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<Option<ShipmentRow>, AppError> {
        let shipment = sqlx::query_as::<_, ShipmentRow>(
            "SELECT * FROM org_shipments WHERE id = ? AND org_id = ?",
        )
        .bind(shipment_id)
        .bind(org_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(shipment)
    }

    pub async fn find_shipment_header(
        &self,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<Option<ShipmentRow>, AppError> {
        let shipment = sqlx::query_as::<_, ShipmentRow>(
            "SELECT * FROM org_shipments WHERE id = ? AND org_id = ?",
        )
        .bind(shipment_id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(shipment)
    }

    pub async fn items_for_shipment(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<Vec<ShipmentItem>, AppError> {
        let items = sqlx::query_as::<_, ShipmentItem>(
            "SELECT * FROM org_shipment_items WHERE shipment_id = ? AND org_id = ? ORDER BY id ASC",
        )
        .bind(shipment_id)
        .bind(org_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(items)
    }

    // Crédito compensatório: se o produto já foi apagado, o UPDATE não
    // encontra linha e a devolução daquele item é um no-op.
    pub async fn restore_stock(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE org_products SET stock = stock + ? WHERE id = ? AND org_id = ?")
            .bind(quantity)
            .bind(product_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    // Os itens caem em cascata (FK)
    pub async fn delete_shipment(
        &self,
        conn: &mut SqliteConnection,
        org_id: &str,
        shipment_id: &str,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM org_shipments WHERE id = ? AND org_id = ?")
            .bind(shipment_id)
            .bind(org_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
