//! Resource type registry.
//!
//! The [`TypeRegistry`] maps a template resource kind (for example
//! `AWS::S3::Bucket`) to the [`ResourceType`] used to draw it: a
//! [`ResourceCategory`] and an icon name. The mapping is a plain table built
//! once; kinds that are not in the table are reported as unsupported by the
//! graph builder and left out of the diagram.
//!
//! # Example
//!
//! ```
//! # use stackgraph_core::registry::{ResourceCategory, TypeRegistry};
//! let registry = TypeRegistry::default();
//!
//! let bucket = registry.lookup("AWS::S3::Bucket").expect("bucket is built in");
//! assert_eq!(bucket.category(), ResourceCategory::Storage);
//! assert_eq!(bucket.icon(), "S3");
//!
//! assert!(registry.lookup("Vendor::Custom::Widget").is_none());
//! ```

use std::{
    collections::HashMap,
    fmt::{self, Display},
    str::FromStr,
};

use log::trace;
use serde::Deserialize;

/// The resource kind that embeds another template as a nested stack.
pub const NESTED_STACK_KIND: &str = "AWS::CloudFormation::Stack";

/// Renderer category of a resource kind.
///
/// The names match external configuration strings (snake_case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Compute,
    Storage,
    Network,
    Security,
    Database,
    Messaging,
    Management,
    Analytics,
    Integration,
    Mobile,
    General,
}

impl ResourceCategory {
    /// All categories, in declaration order.
    pub const ALL: [ResourceCategory; 11] = [
        ResourceCategory::Compute,
        ResourceCategory::Storage,
        ResourceCategory::Network,
        ResourceCategory::Security,
        ResourceCategory::Database,
        ResourceCategory::Messaging,
        ResourceCategory::Management,
        ResourceCategory::Analytics,
        ResourceCategory::Integration,
        ResourceCategory::Mobile,
        ResourceCategory::General,
    ];
}

impl FromStr for ResourceCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceCategory::ALL
            .into_iter()
            .find(|category| <&'static str>::from(*category) == s)
            .ok_or("Unsupported resource category")
    }
}

impl From<ResourceCategory> for &'static str {
    fn from(val: ResourceCategory) -> Self {
        match val {
            ResourceCategory::Compute => "compute",
            ResourceCategory::Storage => "storage",
            ResourceCategory::Network => "network",
            ResourceCategory::Security => "security",
            ResourceCategory::Database => "database",
            ResourceCategory::Messaging => "messaging",
            ResourceCategory::Management => "management",
            ResourceCategory::Analytics => "analytics",
            ResourceCategory::Integration => "integration",
            ResourceCategory::Mobile => "mobile",
            ResourceCategory::General => "general",
        }
    }
}

impl Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// How a supported resource kind is drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    category: ResourceCategory,
    icon: String,
    nested_stack: bool,
}

impl ResourceType {
    /// Create a resource type drawn with the given category and icon.
    pub fn new(category: ResourceCategory, icon: impl Into<String>) -> Self {
        Self {
            category,
            icon: icon.into(),
            nested_stack: false,
        }
    }

    /// Mark this resource type as embedding a nested template.
    pub fn with_nested_stack(mut self, nested_stack: bool) -> Self {
        self.nested_stack = nested_stack;
        self
    }

    pub fn category(&self) -> ResourceCategory {
        self.category
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Returns `true` if resources of this type point at a nested template
    /// that is expanded into a cluster.
    pub fn is_nested_stack(&self) -> bool {
        self.nested_stack
    }
}

/// Built-in kinds as `(kind, category, icon)`.
const BUILTIN_TYPES: &[(&str, ResourceCategory, &str)] = &[
    (NESTED_STACK_KIND, ResourceCategory::Management, "CloudformationStack"),
    ("AWS::S3::Bucket", ResourceCategory::Storage, "S3"),
    ("AWS::CertificateManager::Certificate", ResourceCategory::Security, "ACM"),
    ("AWS::Serverless::HttpApi", ResourceCategory::Mobile, "APIGateway"),
    ("AWS::Serverless::Function", ResourceCategory::Compute, "Lambda"),
    ("AWS::Lambda::Function", ResourceCategory::Compute, "Lambda"),
    ("Type::Custom::SSM", ResourceCategory::Compute, "LambdaFunction"),
    ("AWS::CloudFront::Distribution", ResourceCategory::Network, "CloudFront"),
    ("AWS::S3::BucketPolicy", ResourceCategory::Security, "IAMPermissions"),
    ("AWS::IAM::User", ResourceCategory::General, "User"),
    ("AWS::EC2::Instance", ResourceCategory::Compute, "EC2"),
    ("AWS::AutoScaling::AutoScalingGroup", ResourceCategory::Compute, "EC2AutoScaling"),
    ("AWS::EC2::VPC", ResourceCategory::Network, "VPC"),
    ("AWS::Route53::HostedZone", ResourceCategory::Network, "Route53HostedZone"),
    ("AWS::EC2::InternetGateway", ResourceCategory::Network, "InternetGateway"),
    ("AWS::EC2::TransitGateway", ResourceCategory::Network, "TransitGateway"),
    ("AWS::EC2::NatGateway", ResourceCategory::Network, "NATGateway"),
    ("AWS::EC2::RouteTable", ResourceCategory::Network, "RouteTable"),
    ("AWS::EC2::NetworkAcl", ResourceCategory::Network, "Nacl"),
    ("AWS::EC2::Subnet", ResourceCategory::Network, "PrivateSubnet"),
    ("AWS::ElasticLoadBalancingV2::LoadBalancer", ResourceCategory::Network, "ELB"),
    ("AWS::IAM::Role", ResourceCategory::Security, "IAMRole"),
    ("AWS::Cognito::UserPool", ResourceCategory::Security, "Cognito"),
    ("AWS::ApiGateway::RestApi", ResourceCategory::Mobile, "APIGateway"),
    ("AWS::ApiGateway::HttpApi", ResourceCategory::Mobile, "APIGateway"),
    ("AWS::DynamoDB::Table", ResourceCategory::Database, "DynamodbTable"),
    ("AWS::ECS::Cluster", ResourceCategory::Compute, "ECS"),
    ("AWS::IAM::Policy", ResourceCategory::Security, "IAMPermissions"),
    ("AWS::ECS::TaskDefinition", ResourceCategory::Compute, "ElasticContainerServiceContainer"),
    ("AWS::ECS::Service", ResourceCategory::Compute, "ElasticContainerServiceService"),
    ("AWS::Kinesis::Stream", ResourceCategory::Analytics, "Kinesis"),
    ("AWS::StepFunctions::StateMachine", ResourceCategory::Integration, "StepFunctions"),
    ("AWS::SQS::Queue", ResourceCategory::Integration, "SimpleQueueServiceSqsQueue"),
];

/// Table of supported resource kinds.
///
/// [`TypeRegistry::default`] holds the built-in kinds; [`TypeRegistry::register`]
/// adds or replaces entries, which is how configured kinds are merged in.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, ResourceType>,
}

impl TypeRegistry {
    /// Create a registry with no supported kinds.
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in kinds.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for (kind, category, icon) in BUILTIN_TYPES {
            let resource_type =
                ResourceType::new(*category, *icon).with_nested_stack(*kind == NESTED_STACK_KIND);
            registry.register(*kind, resource_type);
        }
        registry
    }

    /// Add a kind to the registry.
    ///
    /// Returns the previous entry if the kind was already registered.
    pub fn register(
        &mut self,
        kind: impl Into<String>,
        resource_type: ResourceType,
    ) -> Option<ResourceType> {
        let kind = kind.into();
        trace!(kind, resource_type:?; "Registering resource type");
        self.types.insert(kind, resource_type)
    }

    /// Look up how a resource kind is drawn, or `None` if it is unsupported.
    pub fn lookup(&self, kind: &str) -> Option<&ResourceType> {
        self.types.get(kind)
    }

    /// Returns `true` if the kind has an entry in the registry.
    pub fn supports(&self, kind: &str) -> bool {
        self.types.contains_key(kind)
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all registered kinds, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_table_entry() {
        let registry = TypeRegistry::builtin();

        assert_eq!(registry.len(), BUILTIN_TYPES.len());
        for (kind, category, icon) in BUILTIN_TYPES {
            let resource_type = registry.lookup(kind).unwrap();
            assert_eq!(resource_type.category(), *category);
            assert_eq!(resource_type.icon(), *icon);
        }
    }

    #[test]
    fn test_only_stack_is_nested() {
        let registry = TypeRegistry::builtin();

        let nested: Vec<&str> = registry
            .kinds()
            .filter(|kind| registry.lookup(kind).unwrap().is_nested_stack())
            .collect();
        assert_eq!(nested, vec![NESTED_STACK_KIND]);
    }

    #[test]
    fn test_lambda_kinds_share_icon() {
        let registry = TypeRegistry::default();

        let serverless = registry.lookup("AWS::Serverless::Function").unwrap();
        let lambda = registry.lookup("AWS::Lambda::Function").unwrap();
        assert_eq!(serverless, lambda);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let registry = TypeRegistry::default();

        assert!(registry.lookup("Vendor::Custom::Widget").is_none());
        assert!(!registry.supports("Vendor::Custom::Widget"));
        // Lookups are exact.
        assert!(registry.lookup("aws::s3::bucket").is_none());
    }

    #[test]
    fn test_register_replaces_existing() {
        let mut registry = TypeRegistry::default();

        let previous = registry.register(
            "AWS::S3::Bucket",
            ResourceType::new(ResourceCategory::Database, "Custom"),
        );
        assert_eq!(
            previous.map(|t| t.category()),
            Some(ResourceCategory::Storage)
        );
        assert_eq!(
            registry.lookup("AWS::S3::Bucket").unwrap().icon(),
            "Custom"
        );
    }

    #[test]
    fn test_empty_registry() {
        let mut registry = TypeRegistry::empty();
        assert!(registry.is_empty());

        registry.register(
            "Vendor::Custom::Widget",
            ResourceType::new(ResourceCategory::General, "Widget"),
        );
        assert_eq!(registry.len(), 1);
        assert!(registry.supports("Vendor::Custom::Widget"));
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in ResourceCategory::ALL {
            let name = category.to_string();
            assert_eq!(name.parse::<ResourceCategory>(), Ok(category));
        }
        assert!("quantum".parse::<ResourceCategory>().is_err());
    }

    #[test]
    fn test_category_deserializes_snake_case() {
        #[derive(Deserialize)]
        struct Entry {
            category: ResourceCategory,
        }

        let entry: Entry = toml::from_str(r#"category = "integration""#).unwrap();
        assert_eq!(entry.category, ResourceCategory::Integration);
    }
}
