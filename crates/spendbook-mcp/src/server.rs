use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, ListResourcesResult, PaginatedRequestParam,
        RawResource, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::Serialize;
use serde_json::json;

use spendbook_core::{ExpenseChanges, IncomeChanges, NewExpense, NewIncome, StoreError};
use spendbook_sqlite::SqliteStore;

use crate::categories::{CategoryCatalog, CATEGORIES_URI};
use crate::requests::{
    AddExpenseRequest, AddIncomeRequest, DateRangeRequest, DeleteRequest, EditExpenseRequest,
    EditIncomeRequest, SummarizeRequest,
};

/// The Spendbook MCP server: ten tools over the store plus the category
/// resource. Tool state is just the store handle and the preloaded
/// category document; every call is independent.
#[derive(Clone)]
pub struct SpendbookServer {
    store: SqliteStore,
    categories: CategoryCatalog,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SpendbookServer {
    pub fn new(store: SqliteStore, categories: CategoryCatalog) -> Self {
        Self {
            store,
            categories,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add a new expense entry and return its id.")]
    async fn add_expense(
        &self,
        Parameters(req): Parameters<AddExpenseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let new = NewExpense {
            date: req.date,
            amount: req.amount,
            category: req.category,
            subcategory: req.subcategory,
            note: req.note,
        };
        match self.store.add_expense(&new).await {
            Ok(id) => json_result(&json!({ "status": "ok", "id": id })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Edit an existing expense entry. Only provided fields are updated.")]
    async fn edit_expense(
        &self,
        Parameters(req): Parameters<EditExpenseRequest>,
    ) -> Result<CallToolResult, McpError> {
        let changes = ExpenseChanges {
            date: req.date,
            amount: req.amount,
            category: req.category,
            subcategory: req.subcategory,
            note: req.note,
        };
        match self.store.edit_expense(req.id, &changes).await {
            Ok(updated) => json_result(&json!({
                "status": "ok",
                "id": req.id,
                "updated_fields": updated,
            })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Delete an expense entry by id.")]
    async fn delete_expense(
        &self,
        Parameters(req): Parameters<DeleteRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.delete_expense(req.id).await {
            Ok(()) => json_result(&json!({
                "status": "ok",
                "id": req.id,
                "message": "Expense deleted successfully",
            })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "List expense entries within an inclusive date range.")]
    async fn list_expenses(
        &self,
        Parameters(req): Parameters<DateRangeRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.list_expenses(&req.start_date, &req.end_date).await {
            Ok(rows) => json_result(&rows),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Add an income entry (e.g. salary, bonus, refund) and return its id.")]
    async fn add_income(
        &self,
        Parameters(req): Parameters<AddIncomeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let new = NewIncome {
            date: req.date,
            amount: req.amount,
            source: req.source,
            note: req.note,
        };
        match self.store.add_income(&new).await {
            Ok(id) => json_result(&json!({ "status": "ok", "id": id })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Edit an existing income entry. Only provided fields are updated.")]
    async fn edit_income(
        &self,
        Parameters(req): Parameters<EditIncomeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let changes = IncomeChanges {
            date: req.date,
            amount: req.amount,
            source: req.source,
            note: req.note,
        };
        match self.store.edit_income(req.id, &changes).await {
            Ok(updated) => json_result(&json!({
                "status": "ok",
                "id": req.id,
                "updated_fields": updated,
            })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Delete an income entry by id.")]
    async fn delete_income(
        &self,
        Parameters(req): Parameters<DeleteRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.delete_income(req.id).await {
            Ok(()) => json_result(&json!({
                "status": "ok",
                "id": req.id,
                "message": "Income deleted successfully",
            })),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "List income entries within an inclusive date range.")]
    async fn list_income(
        &self,
        Parameters(req): Parameters<DateRangeRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.list_income(&req.start_date, &req.end_date).await {
            Ok(rows) => json_result(&rows),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Calculate net balance (total income minus total expenses) for a date range.")]
    async fn get_balance(
        &self,
        Parameters(req): Parameters<DateRangeRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.balance(&req.start_date, &req.end_date).await {
            Ok(report) => json_result(&report),
            Err(err) => json_result(&error_body(&err)),
        }
    }

    #[tool(description = "Summarize expenses by category within an inclusive date range.")]
    async fn summarize(
        &self,
        Parameters(req): Parameters<SummarizeRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self
            .store
            .summarize(&req.start_date, &req.end_date, req.category.as_deref())
            .await
        {
            Ok(groups) => json_result(&groups),
            Err(err) => json_result(&error_body(&err)),
        }
    }
}

#[tool_handler]
impl ServerHandler for SpendbookServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.instructions = Some(
            "Personal expense and income tracker. Use the add/edit/delete/list tools \
             to manage records, get_balance and summarize for aggregates, and the \
             categories resource for the advisory category list. Dates are compared \
             as text, so always pass ISO-8601 (YYYY-MM-DD)."
                .to_string(),
        );
        info.capabilities = ServerCapabilities::builder()
            .enable_tools()
            .enable_resources()
            .build();
        info
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut categories = RawResource::new(CATEGORIES_URI, "categories".to_string());
        categories.description = Some("Known expense categories for populating pickers".to_string());
        categories.mime_type = Some("application/json".to_string());
        Ok(ListResourcesResult {
            meta: None,
            resources: vec![categories.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri, .. }: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        if uri != CATEGORIES_URI {
            return Err(McpError::resource_not_found(
                "resource not found",
                Some(json!({ "uri": uri })),
            ));
        }
        let mut contents = ResourceContents::text(self.categories.body(), CATEGORIES_URI);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some("application/json".to_string());
        }
        Ok(ReadResourceResult::new(vec![contents]))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let body =
        serde_json::to_string(value).map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(body)]))
}

fn error_body(err: &StoreError) -> serde_json::Value {
    json!({ "status": "error", "message": err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendbook_core::RecordKind;

    #[test]
    fn error_body_has_the_structured_shape() {
        let body = error_body(&StoreError::not_found(RecordKind::Expense, 42));
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Expense with id 42 not found");

        let body = error_body(&StoreError::NoFieldsToUpdate);
        assert_eq!(body["message"], "no fields to update");
    }

    #[test]
    fn read_only_errors_mention_permissions() {
        let body = error_body(&StoreError::ReadOnly(
            "attempt to write a readonly database".to_string(),
        ));
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("read-only"));
        assert!(message.contains("permissions"));
    }
}
