use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Driver {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
}
