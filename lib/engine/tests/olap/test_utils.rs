use rdf_olap_engine::{
    LinkedDataEngine, MemoryCube, MemoryLinkedDataEngine, OlapConnection, OlapConnectionConfig,
    Restrictions,
};
use rdf_olap_logical::LogicalOlapOp;
use rdf_olap_mdx::parse_tree::ParseTreeNode;
use rdf_olap_model::metadata::{Aggregator, DimensionType};
use rdf_olap_model::{OlapResult, RowSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A `Sales` cube with the dimensions `Time` (`Year > Quarter`) and `Geo` (`Country`) and the
/// measures `Amount` (SUM) and `Price` (AVG).
///
/// | Quarter | Country | Amount | Price   |
/// |---------|---------|--------|---------|
/// | 2020 Q1 | AT      | 10     | 1.5     |
/// | 2020 Q2 | AT      | 5.5    | 2       |
/// | 2020 Q1 | DE      | 7      | 3.14159 |
/// | 2021 Q1 | DE      | 20     |         |
pub fn sales() -> MemoryCube {
    MemoryCube::builder("Sales")
        .dimension("Time", DimensionType::Time, &["Year", "Quarter"])
        .dimension("Geo", DimensionType::Other, &["Country"])
        .member("[Time].[Year]", "2020", None)
        .member("[Time].[Year]", "2021", None)
        .member("[Time].[Quarter]", "Q1", Some("[Time].[2020]"))
        .member("[Time].[Quarter]", "Q2", Some("[Time].[2020]"))
        .member("[Time].[Quarter]", "Q1", Some("[Time].[2021]"))
        .member("[Geo].[Country]", "AT", None)
        .member("[Geo].[Country]", "DE", None)
        .measure("Amount", Aggregator::Sum)
        .measure("Price", Aggregator::Avg)
        .fact(
            &["[Time].[2020].[Q1]", "[Geo].[AT]"],
            &[("Amount", 10.0), ("Price", 1.5)],
        )
        .fact(
            &["[Time].[2020].[Q2]", "[Geo].[AT]"],
            &[("Amount", 5.5), ("Price", 2.0)],
        )
        .fact(
            &["[Time].[2020].[Q1]", "[Geo].[DE]"],
            &[("Amount", 7.0), ("Price", 3.14159)],
        )
        .fact(&["[Time].[2021].[Q1]", "[Geo].[DE]"], &[("Amount", 20.0)])
        .build()
        .unwrap()
}

pub fn engine() -> MemoryLinkedDataEngine {
    MemoryLinkedDataEngine::new("LdCatalog", "LdSchema").with_cube(sales())
}

pub fn connection() -> OlapConnection {
    OlapConnection::new(Arc::new(engine()), OlapConnectionConfig::default())
}

pub fn id(unique_name: &str) -> ParseTreeNode {
    ParseTreeNode::parse_identifier(unique_name)
}

/// A set of the members with the given unique names.
pub fn set(unique_names: &[&str]) -> ParseTreeNode {
    ParseTreeNode::set(unique_names.iter().map(|name| id(name)))
}

/// Counts the requests that reach the wrapped engine.
pub struct CountingEngine {
    inner: MemoryLinkedDataEngine,
    requests: AtomicUsize,
}

impl CountingEngine {
    pub fn new(inner: MemoryLinkedDataEngine) -> Self {
        Self {
            inner,
            requests: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

impl LinkedDataEngine for CountingEngine {
    fn databases(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.databases(restrictions)
    }

    fn catalogs(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.catalogs(restrictions)
    }

    fn schemas(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.schemas(restrictions)
    }

    fn cubes(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.cubes(restrictions)
    }

    fn dimensions(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.dimensions(restrictions)
    }

    fn measures(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.measures(restrictions)
    }

    fn hierarchies(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.hierarchies(restrictions)
    }

    fn levels(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.levels(restrictions)
    }

    fn members(&self, restrictions: &Restrictions) -> OlapResult<RowSet> {
        self.count();
        self.inner.members(restrictions)
    }

    fn execute_olap_query(&self, plan: &LogicalOlapOp) -> OlapResult<RowSet> {
        self.inner.execute_olap_query(plan)
    }
}
