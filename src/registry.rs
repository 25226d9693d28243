use std::fmt;

/// The static bronze-tier dataset registry. Fixed at compile time; a run
/// always processes every variant in `ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Calendar,
    Customers,
    Categories,
    Products,
    Returns,
    Sales,
    Territories,
    Subcategories,
}

impl Dataset {
    pub const ALL: [Dataset; 8] = [
        Dataset::Calendar,
        Dataset::Customers,
        Dataset::Categories,
        Dataset::Products,
        Dataset::Returns,
        Dataset::Sales,
        Dataset::Territories,
        Dataset::Subcategories,
    ];

    /// Logical name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            Dataset::Calendar => "calendar",
            Dataset::Customers => "customers",
            Dataset::Categories => "categories",
            Dataset::Products => "products",
            Dataset::Returns => "returns",
            Dataset::Sales => "sales",
            Dataset::Territories => "territories",
            Dataset::Subcategories => "subcategories",
        }
    }

    /// Source file pattern under the bronze container. A trailing `*` marks a
    /// multi-file dataset; the loader appends the `.csv` extension.
    pub fn file_pattern(self) -> &'static str {
        match self {
            Dataset::Calendar => "AdventureWorks_Calendar",
            Dataset::Customers => "AdventureWorks_Customers",
            Dataset::Categories => "AdventureWorks_Product_Categories",
            Dataset::Products => "AdventureWorks_Products",
            Dataset::Returns => "AdventureWorks_Returns",
            Dataset::Sales => "AdventureWorks_Sales*",
            Dataset::Territories => "AdventureWorks_Territories",
            Dataset::Subcategories => "Product_Subcategories",
        }
    }

    /// Silver output directory name: the file pattern with wildcards stripped.
    pub fn target_segment(self) -> String {
        self.file_pattern().replace('*', "")
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
