use coinkeeper_engine::{
    db_types::{Budget, Expense, NewBudget, NewExpense, NewUser, User},
    traits::{BudgetError, BudgetManagement, ExpenseError, ExpenseManagement, UserAccountError, UserManagement},
    ExpenseQueryFilter,
};
use mockall::mock;

mock! {
    pub UserManager {}
    impl UserManagement for UserManager {
        async fn create_user(&self, user: NewUser) -> Result<User, UserAccountError>;
        async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, UserAccountError>;
        async fn fetch_user_by_id(&self, id: i64) -> Result<Option<User>, UserAccountError>;
    }
}

mock! {
    pub ExpenseManager {}
    impl ExpenseManagement for ExpenseManager {
        async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, ExpenseError>;
        async fn fetch_expenses_for_user(&self, user_id: i64) -> Result<Vec<Expense>, ExpenseError>;
        async fn fetch_expense_by_id(&self, id: i64) -> Result<Option<Expense>, ExpenseError>;
        async fn search_expenses(&self, filter: ExpenseQueryFilter) -> Result<Vec<Expense>, ExpenseError>;
        async fn delete_expense(&self, id: i64) -> Result<(), ExpenseError>;
    }
}

mock! {
    pub BudgetManager {}
    impl BudgetManagement for BudgetManager {
        async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, BudgetError>;
        async fn fetch_budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>, BudgetError>;
        async fn fetch_budget_by_id(&self, id: i64) -> Result<Option<Budget>, BudgetError>;
        async fn fetch_budget_for_category(&self, user_id: i64, category: &str) -> Result<Option<Budget>, BudgetError>;
        async fn delete_budget(&self, id: i64) -> Result<(), BudgetError>;
    }
}

// The analytics handlers need a backend that is both an expense and a budget store.
mock! {
    pub Ledger {}
    impl ExpenseManagement for Ledger {
        async fn insert_expense(&self, expense: NewExpense) -> Result<Expense, ExpenseError>;
        async fn fetch_expenses_for_user(&self, user_id: i64) -> Result<Vec<Expense>, ExpenseError>;
        async fn fetch_expense_by_id(&self, id: i64) -> Result<Option<Expense>, ExpenseError>;
        async fn search_expenses(&self, filter: ExpenseQueryFilter) -> Result<Vec<Expense>, ExpenseError>;
        async fn delete_expense(&self, id: i64) -> Result<(), ExpenseError>;
    }
    impl BudgetManagement for Ledger {
        async fn insert_budget(&self, budget: NewBudget) -> Result<Budget, BudgetError>;
        async fn fetch_budgets_for_user(&self, user_id: i64) -> Result<Vec<Budget>, BudgetError>;
        async fn fetch_budget_by_id(&self, id: i64) -> Result<Option<Budget>, BudgetError>;
        async fn fetch_budget_for_category(&self, user_id: i64, category: &str) -> Result<Option<Budget>, BudgetError>;
        async fn delete_budget(&self, id: i64) -> Result<(), BudgetError>;
    }
}
