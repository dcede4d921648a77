use super::default_true;
use crate::knowledge::{NewKnowledge, RelevantNodesQuery, SearchQuery};
use rmcp::schemars;
use serde::{Deserialize, Serialize};

fn three() -> u32 {
    3
}

fn five() -> u32 {
    5
}

fn ten() -> usize {
    10
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct SearchKnowledge {
    #[schemars(description = "Natural language query")]
    pub query: String,
    #[serde(default = "three")]
    #[schemars(description = "Number of results to return")]
    pub n_results: u32,
    #[serde(default)]
    #[schemars(description = "Only entries in this category")]
    pub category: Option<String>,
}

impl From<SearchKnowledge> for SearchQuery {
    fn from(args: SearchKnowledge) -> Self {
        SearchQuery {
            query: args.query,
            n_results: args.n_results,
            category: args.category,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct AddKnowledge {
    #[schemars(description = "Text to store")]
    pub document: String,
    #[schemars(description = "Category, e.g. ai, blueprint, umg or troubleshooting")]
    pub category: String,
    #[serde(default)]
    #[schemars(description = "Comma separated tags")]
    pub tags: Option<String>,
    #[serde(default)]
    #[schemars(description = "Explicit document id; generated when omitted")]
    pub doc_id: Option<String>,
}

impl From<AddKnowledge> for NewKnowledge {
    fn from(args: AddKnowledge) -> Self {
        NewKnowledge {
            document: args.document,
            category: args.category,
            tags: args.tags,
            id: args.doc_id,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct DeleteKnowledge {
    #[schemars(description = "Id of the document to delete")]
    pub doc_id: String,
}

#[derive(Debug, Deserialize, Serialize, schemars::JsonSchema, Clone)]
pub struct FindRelevantNodes {
    #[schemars(description = "What you want to build, in English or Japanese")]
    pub query: String,
    #[serde(default = "default_true")]
    #[schemars(description = "Search the knowledge base")]
    pub include_rag: bool,
    #[serde(default = "default_true")]
    #[schemars(description = "Scan project classes")]
    pub include_project: bool,
    #[serde(default = "five")]
    #[schemars(description = "Maximum knowledge base hits")]
    pub max_rag_results: u32,
    #[serde(default = "ten")]
    #[schemars(description = "Maximum project classes")]
    pub max_project_results: usize,
    #[serde(default)]
    #[schemars(description = "C++ module to scan when no keyword maps to a parent class")]
    pub module_filter: Option<String>,
}

impl From<FindRelevantNodes> for RelevantNodesQuery {
    fn from(args: FindRelevantNodes) -> Self {
        RelevantNodesQuery {
            query: args.query,
            include_rag: args.include_rag,
            include_project: args.include_project,
            max_rag_results: args.max_rag_results,
            max_project_results: args.max_project_results,
            module_filter: args.module_filter,
        }
    }
}
