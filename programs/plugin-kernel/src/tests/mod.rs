// Unit tests for plugin-kernel state and authorization logic

mod unit;
