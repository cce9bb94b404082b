// Staff profile documents. One struct per collection; all carry the same
// shared block (user back-reference, name/email/phone, is_active, join_date)
// the cascade service keeps in sync with the owning user.

use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pharmacist {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub pharmacist_id: String,  // PHAR-####
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    pub shift: String,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Administrator {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub admin_id: String,  // ADM-####
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InventoryManager {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub manager_id: String,  // INV-####
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    #[serde(default)]
    pub managed_categories: Vec<String>,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LabSupervisor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub supervisor_id: String,  // LSUP-####
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LabStaff {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub staff_id: String,  // LSTF-####
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    pub shift: String,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Technician {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub technician_id: String,  // T###
    pub user: ObjectId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    pub shift: String,
    pub is_active: bool,
    pub join_date: BsonDateTime,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}
