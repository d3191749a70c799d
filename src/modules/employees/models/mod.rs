pub mod employee;

pub use employee::{Employee, EmployeePatch, EmployeeQuery, NewEmployeeRequest, DEFAULT_COMMISSION_RATE};
