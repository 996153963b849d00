// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use egg_collection::domain::collection::{DuckEggs, HenEggs, NewCollectionRequest};
use egg_collection::domain::party::{
    CollectionRoute, Customer, EggProduction, PerformanceMetrics, Staff,
};
use egg_collection::domain::types::{CustomerType, EGG_COLLECTION_PERMISSION};

/// 固定测试时间
pub fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

// ==========================================
// Customer 构建器
// ==========================================

pub struct FarmerBuilder {
    id: String,
    customer_type: CustomerType,
    contact_person: String,
    business_name: Option<String>,
    active: bool,
    credit_balance: f64,
    egg_production: EggProduction,
}

impl FarmerBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            customer_type: CustomerType::Farmer,
            contact_person: format!("Farmer {}", id),
            business_name: None,
            active: true,
            credit_balance: 0.0,
            egg_production: EggProduction::default(),
        }
    }

    pub fn business_name(mut self, name: &str) -> Self {
        self.business_name = Some(name.to_string());
        self
    }

    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn credit_balance(mut self, balance: f64) -> Self {
        self.credit_balance = balance;
        self
    }

    pub fn expected(mut self, hen_eggs: f64, duck_eggs: f64) -> Self {
        self.egg_production = EggProduction { hen_eggs, duck_eggs };
        self
    }

    pub fn build(self) -> Customer {
        let now = ts(2026, 1, 1, 0, 0);
        Customer {
            id: self.id,
            customer_type: self.customer_type,
            contact_person: self.contact_person,
            business_name: self.business_name,
            phone: None,
            active: self.active,
            credit_limit: 500.0,
            credit_balance: self.credit_balance,
            egg_production: self.egg_production,
            total_egg_sales: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

// ==========================================
// Staff 构建器
// ==========================================

pub struct StaffBuilder {
    id: String,
    active: bool,
    permissions: Vec<String>,
}

impl StaffBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            active: true,
            permissions: vec![EGG_COLLECTION_PERMISSION.to_string()],
        }
    }

    pub fn without_collection_permission(mut self) -> Self {
        self.permissions = vec!["sales".to_string()];
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn build(self) -> Staff {
        Staff {
            name: format!("Collector {}", self.id),
            id: self.id,
            active: self.active,
            permissions: self.permissions,
            performance_metrics: PerformanceMetrics::default(),
            updated_at: ts(2026, 1, 1, 0, 0),
        }
    }
}

// ==========================================
// CollectionRoute 构建器
// ==========================================

pub fn route(id: &str, farmer_ids: &[&str]) -> CollectionRoute {
    CollectionRoute {
        id: id.to_string(),
        name: format!("Route {}", id),
        farmer_ids: farmer_ids.iter().map(|s| s.to_string()).collect(),
        assigned_staff_id: None,
        active: true,
    }
}

// ==========================================
// NewCollectionRequest 构建器
// ==========================================

pub struct RequestBuilder {
    request: NewCollectionRequest,
}

impl RequestBuilder {
    pub fn new(farmer_id: &str, staff_id: &str) -> Self {
        Self {
            request: NewCollectionRequest {
                farmer_id: farmer_id.to_string(),
                staff_id: staff_id.to_string(),
                route_id: None,
                hen_eggs: HenEggs {
                    large: 120,
                    ..Default::default()
                },
                duck_eggs: DuckEggs::default(),
                hen_egg_price: 3.0,
                duck_egg_price: 4.0,
                quality_notes: None,
                collection_date: None,
            },
        }
    }

    pub fn route(mut self, route_id: &str) -> Self {
        self.request.route_id = Some(route_id.to_string());
        self
    }

    pub fn hen(mut self, hen_eggs: HenEggs) -> Self {
        self.request.hen_eggs = hen_eggs;
        self
    }

    pub fn duck(mut self, duck_eggs: DuckEggs) -> Self {
        self.request.duck_eggs = duck_eggs;
        self
    }

    pub fn prices(mut self, hen: f64, duck: f64) -> Self {
        self.request.hen_egg_price = hen;
        self.request.duck_egg_price = duck;
        self
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.request.quality_notes = Some(notes.to_string());
        self
    }

    pub fn at(mut self, date: NaiveDateTime) -> Self {
        self.request.collection_date = Some(date);
        self
    }

    pub fn build(self) -> NewCollectionRequest {
        self.request
    }
}

/// 手册示例: 鸡蛋 126 枚 / 鸭蛋 38 枚，2.50 / 4.00 每打
pub fn sample_eggs() -> (HenEggs, DuckEggs) {
    (
        HenEggs {
            small: 24,
            medium: 48,
            large: 36,
            extra_large: 12,
            damaged: 6,
        },
        DuckEggs {
            small: 12,
            medium: 18,
            large: 6,
            damaged: 2,
        },
    )
}
