use std::fmt::{Display, Formatter};

macro_rules! translation_keys {
    ($($(#[$meta:meta])* $variant:ident => $id:literal,)*) => {
        /// Identifier of a localizable UI string, stable across languages.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum TranslationKey {
            $($(#[$meta])* $variant,)*
        }

        impl TranslationKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [TranslationKey] = &[$(TranslationKey::$variant,)*];

            /// Catalog id for this key.
            pub fn id(self) -> &'static str {
                match self {
                    $(Self::$variant => $id,)*
                }
            }

            pub fn from_id(id: &str) -> Option<TranslationKey> {
                match id {
                    $($id => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

translation_keys! {
    // Navigation
    Home => "home",
    Shop => "shop",
    Categories => "categories",
    Search => "search",
    SearchPlaceholder => "search_placeholder",
    Cart => "cart",
    Checkout => "checkout",
    Orders => "orders",
    Profile => "profile",
    Settings => "settings",
    Login => "login",
    Logout => "logout",
    Register => "register",
    /// Takes `{name}`.
    Welcome => "welcome",

    // Storefront
    AddToCart => "add_to_cart",
    BuyNow => "buy_now",
    Price => "price",
    /// Takes `{percent}`.
    DiscountOff => "discount_off",
    InStock => "in_stock",
    OutOfStock => "out_of_stock",
    /// Takes `{count}`.
    CartItems => "cart_items",
    EmptyCart => "empty_cart",
    Subtotal => "subtotal",
    Total => "total",

    // Orders and tracking
    TrackOrder => "track_order",
    OrderPlaced => "order_placed",
    OrderShipped => "order_shipped",
    OrderDelivered => "order_delivered",
    OrderCancelled => "order_cancelled",

    // Dashboards
    SellerDashboard => "seller_dashboard",
    AdminDashboard => "admin_dashboard",
    RiderDashboard => "rider_dashboard",
    AgentDashboard => "agent_dashboard",
    Earnings => "earnings",
    TotalEarnings => "total_earnings",
    Products => "products",

    // Notifications
    Notifications => "notifications",
    /// Takes `{count}`.
    UnreadNotifications => "unread_notifications",
    MarkAllRead => "mark_all_read",

    // Preferences
    Language => "language",
    Currency => "currency",
}

impl Display for TranslationKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
