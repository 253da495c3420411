/// Builds an element with optional attributes and children.
///
/// ```
/// use blogfeed_dom::element;
///
/// let button = element!("button", "data-post-id" => 7u64; "Show Comments");
/// assert_eq!(button.text_content(), "Show Comments");
/// assert_eq!(button.attr("data-post-id").as_deref(), Some("7"));
/// ```
#[macro_export]
macro_rules! element {
    ($name:expr $(, $key:expr => $value:expr)* $(; $($child:expr),* $(,)?)?) => {{
        let element = $crate::Node::element($name);
        $($crate::attrs::IntoAttr::set_attr($value, &element, $key);)*
        $($(element.append(&$crate::IntoNode::into_node($child));)*)?
        element
    }};
}
