// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

// Uma entrada de tradução, registrada em tempo de compilação via `inventory`
pub struct Translation {
    pub lang: &'static str,
    pub key: &'static str,
    pub text: &'static str,
}

inventory::collect!(Translation);

macro_rules! translations {
    ($lang:literal { $($key:literal => $text:literal),* $(,)? }) => {
        $(
            inventory::submit! {
                Translation { lang: $lang, key: $key, text: $text }
            }
        )*
    };
}

type Messages = HashMap<&'static str, HashMap<&'static str, &'static str>>;

#[derive(Clone, Default)]
pub struct I18nStore {
    messages: Arc<Messages>,
}

impl I18nStore {
    /// Junta todas as traduções registradas no binário.
    pub fn load() -> Self {
        let mut messages = Messages::new();
        for t in inventory::iter::<Translation> {
            messages.entry(t.lang).or_default().insert(t.key, t.text);
        }
        Self { messages: Arc::new(messages) }
    }

    // Idioma pedido -> inglês -> a própria chave
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages.get(lang).and_then(|m| m.get(key)).copied()
    }
}

translations!("en" {
    "error.validation" => "One or more fields are invalid.",
    "error.not_found" => "Resource not found.",
    "error.internal" => "An unexpected error occurred.",
    "auth.email_exists" => "This e-mail is already in use.",
    "auth.invalid_credentials" => "Invalid e-mail or password.",
    "auth.current_password_invalid" => "The current password is incorrect.",
    "auth.invalid_token" => "Authentication token is invalid or missing.",
    "auth.user_not_found" => "User not found.",
    "business.header_missing" => "The x-business-id header is required.",
    "business.header_invalid" => "The x-business-id header is not a valid UUID.",
    "business.not_found" => "Business not found.",
    "branch.not_found" => "Branch not found.",
    "category.not_found" => "Category not found.",
    "item.not_found" => "Item not found.",
    "customer.not_found" => "Customer not found.",
    "order.not_found" => "Order not found.",
    "payment.not_found" => "Payment not found.",
    "expense.not_found" => "Expense not found.",
    "supplier.not_found" => "Supplier not found.",
    "item.sku_exists" => "An item with this SKU already exists.",
    "category.name_exists" => "A category with this name already exists.",
    "customer.email_exists" => "A customer with this e-mail already exists.",
    "expense_category.name_exists" => "An expense category with this name already exists.",
    "customer.has_orders" => "This customer has orders and cannot be deleted.",
    "order.without_items" => "Please add at least one item to the order.",
    "order.no_valid_items" => "No valid items selected.",
    "inventory.insufficient_stock" => "Stock cannot go below zero.",
    "inventory.stock_limit" => "Stock cannot exceed 1,000,000,000 units.",
    "order.total_too_large" => "The order total exceeds the maximum allowed amount.",
    "report.invalid_type" => "Report type must be one of: summary, sales, expenses, inventory, customers, suppliers, full.",
    "report.invalid_date_range" => "The start date must not be after the end date.",
});

translations!("pt" {
    "error.validation" => "Um ou mais campos são inválidos.",
    "error.not_found" => "Recurso não encontrado.",
    "error.internal" => "Ocorreu um erro inesperado.",
    "auth.email_exists" => "Este e-mail já está em uso.",
    "auth.invalid_credentials" => "E-mail ou senha inválidos.",
    "auth.current_password_invalid" => "A senha atual está incorreta.",
    "auth.invalid_token" => "Token de autenticação inválido ou ausente.",
    "auth.user_not_found" => "Usuário não encontrado.",
    "business.header_missing" => "O cabeçalho x-business-id é obrigatório.",
    "business.header_invalid" => "Cabeçalho x-business-id inválido (não é um UUID).",
    "business.not_found" => "Empresa não encontrada.",
    "branch.not_found" => "Filial não encontrada.",
    "category.not_found" => "Categoria não encontrada.",
    "item.not_found" => "Item não encontrado.",
    "customer.not_found" => "Cliente não encontrado.",
    "order.not_found" => "Pedido não encontrado.",
    "payment.not_found" => "Pagamento não encontrado.",
    "expense.not_found" => "Despesa não encontrada.",
    "supplier.not_found" => "Fornecedor não encontrado.",
    "item.sku_exists" => "Já existe um item com este SKU.",
    "category.name_exists" => "Já existe uma categoria com este nome.",
    "customer.email_exists" => "Já existe um cliente com este e-mail.",
    "expense_category.name_exists" => "Já existe uma categoria de despesa com este nome.",
    "customer.has_orders" => "Este cliente possui pedidos e não pode ser excluído.",
    "order.without_items" => "Adicione pelo menos um item ao pedido.",
    "order.no_valid_items" => "Nenhum item válido selecionado.",
    "inventory.insufficient_stock" => "O estoque não pode ficar negativo.",
    "inventory.stock_limit" => "O estoque não pode passar de 1.000.000.000 unidades.",
    "order.total_too_large" => "O total do pedido excede o valor máximo permitido.",
    "report.invalid_type" => "Tipo de relatório deve ser: summary, sales, expenses, inventory, customers, suppliers, full.",
    "report.invalid_date_range" => "A data inicial não pode ser posterior à data final.",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english_then_key() {
        let store = I18nStore::load();

        assert_eq!(store.translate("pt", "order.no_valid_items"), "Nenhum item válido selecionado.");
        assert_eq!(store.translate("fr", "order.no_valid_items"), "No valid items selected.");
        assert_eq!(store.translate("fr", "unknown.key"), "unknown.key");
    }
}
