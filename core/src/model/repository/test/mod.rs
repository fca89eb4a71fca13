use super::db;
