// src/services/document_service.rs

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::ShipmentPrintData,
};

// Monta os dados do documento imprimível de uma expedição. A renderização
// (HTML/PDF) fica com o consumidor; aqui só saem dados prontos.
#[derive(Clone)]
pub struct DocumentService {
    inventory_repo: InventoryRepository,
}

impl DocumentService {
    pub fn new(inventory_repo: InventoryRepository) -> Self {
        Self { inventory_repo }
    }

    pub async fn shipment_print_data(
        &self,
        org_id: &str,
        org_name: &str,
        shipment_id: &str,
    ) -> Result<ShipmentPrintData, AppError> {
        let header = self
            .inventory_repo
            .find_shipment_header(org_id, shipment_id)
            .await?
            .ok_or(AppError::ShipmentNotFound)?;

        let items = self
            .inventory_repo
            .shipment_print_lines(org_id, shipment_id)
            .await?;
        let total = items.iter().map(|line| line.amount).sum();

        Ok(ShipmentPrintData {
            id: header.id,
            org_name: org_name.to_string(),
            created_at: header.created_at,
            items,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppState;
    use crate::db::OrganizationRepository;
    use crate::models::inventory::ShipmentItemPayload;

    #[tokio::test]
    async fn documento_traz_nomes_total_e_produto_removido() {
        let state = AppState::for_tests().await;

        let org_repo = OrganizationRepository::new(state.db_pool.clone());
        let mut tx = state.db_pool.begin().await.unwrap();
        let org = org_repo
            .create_organization(&mut tx, "Impressões", "PRNT01")
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let snapshot = state
            .inventory_service
            .create_product(&org.id, "Caixa", None, None, 10.0, 5, 4.0)
            .await
            .unwrap();
        let box_id = snapshot.products[0].id.clone();
        let snapshot = state
            .inventory_service
            .create_product(&org.id, "Fita", None, None, 3.0, 8, 1.0)
            .await
            .unwrap();
        let tape_id = snapshot
            .products
            .iter()
            .find(|p| p.name == "Fita")
            .unwrap()
            .id
            .clone();

        let snapshot = state
            .inventory_service
            .create_shipment(
                &org.id,
                &[
                    ShipmentItemPayload {
                        product_id: box_id.clone(),
                        quantity: 2,
                        price: None,
                    },
                    ShipmentItemPayload {
                        product_id: tape_id.clone(),
                        quantity: 4,
                        price: None,
                    },
                ],
            )
            .await
            .unwrap();
        let shipment_id = snapshot.shipments[0].id.clone();

        let data = state
            .document_service
            .shipment_print_data(&org.id, "Impressões", &shipment_id)
            .await
            .unwrap();
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.items[0].product_name, "Caixa");
        assert_eq!(data.total, 10.0 * 2.0 + 3.0 * 4.0);

        // Produto apagado vira nome de reserva, a linha permanece
        let _ = state
            .inventory_service
            .delete_product(&org.id, &box_id)
            .await
            .unwrap();
        let data = state
            .document_service
            .shipment_print_data(&org.id, "Impressões", &shipment_id)
            .await
            .unwrap();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].product_name, "Fita");

        // Fora da organização: não existe
        let err = state
            .document_service
            .shipment_print_data("org_outra", "Outra", &shipment_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ShipmentNotFound));
    }
}
