use std::borrow::Cow;

/// AMF0 type markers, section 2.1.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(u8)]
pub enum Amf0Marker {
    Number = 0x00,
    Boolean = 0x01,
    String = 0x02,
    Object = 0x03,
    /// Reserved, not supported.
    MovieClip = 0x04,
    Null = 0x05,
    Undefined = 0x06,
    Reference = 0x07,
    EcmaArray = 0x08,
    ObjectEnd = 0x09,
    StrictArray = 0x0a,
    Date = 0x0b,
    LongString = 0x0c,
    Unsupported = 0x0d,
    /// Reserved, not supported.
    Recordset = 0x0e,
    XmlDocument = 0x0f,
    TypedObject = 0x10,
    /// Switch to AMF3.
    AvmPlusObject = 0x11,
}

impl TryFrom<u8> for Amf0Marker {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        Ok(match value {
            0x00 => Self::Number,
            0x01 => Self::Boolean,
            0x02 => Self::String,
            0x03 => Self::Object,
            0x04 => Self::MovieClip,
            0x05 => Self::Null,
            0x06 => Self::Undefined,
            0x07 => Self::Reference,
            0x08 => Self::EcmaArray,
            0x09 => Self::ObjectEnd,
            0x0a => Self::StrictArray,
            0x0b => Self::Date,
            0x0c => Self::LongString,
            0x0d => Self::Unsupported,
            0x0e => Self::Recordset,
            0x0f => Self::XmlDocument,
            0x10 => Self::TypedObject,
            0x11 => Self::AvmPlusObject,
            other => return Err(other),
        })
    }
}

impl Amf0Marker {
    /// The three byte sequence (empty key + object-end marker) that closes
    /// objects and, optionally, ECMA arrays.
    pub const OBJECT_END_SEQUENCE: u32 = 0x00_00_09;
}

/// A key/value pair of an object or ECMA array.
pub type Amf0Property<'a> = (Cow<'a, str>, Amf0Value<'a>);

/// A decoded AMF0 value, sections 2.2 to 2.14.
#[derive(PartialEq, Clone, Debug)]
pub enum Amf0Value<'a> {
    Number(f64),
    Boolean(bool),
    String(Cow<'a, str>),
    /// Anonymous object, properties in wire order.
    Object(Cow<'a, [Amf0Property<'a>]>),
    Null,
    Undefined,
    /// Associative array, properties in wire order. Keys may repeat.
    EcmaArray(Cow<'a, [Amf0Property<'a>]>),
    StrictArray(Cow<'a, [Amf0Value<'a>]>),
    Date {
        /// Milliseconds since the Unix epoch.
        timestamp: f64,
        /// Reserved by the format; encoders should write 0.
        timezone: i16,
    },
    LongString(Cow<'a, str>),
}

impl<'a> Amf0Value<'a> {
    #[inline]
    pub fn marker(&self) -> Amf0Marker {
        match self {
            Self::Number(_) => Amf0Marker::Number,
            Self::Boolean(_) => Amf0Marker::Boolean,
            Self::String(_) => Amf0Marker::String,
            Self::Object(_) => Amf0Marker::Object,
            Self::Null => Amf0Marker::Null,
            Self::Undefined => Amf0Marker::Undefined,
            Self::EcmaArray(_) => Amf0Marker::EcmaArray,
            Self::StrictArray(_) => Amf0Marker::StrictArray,
            Self::Date { .. } => Amf0Marker::Date,
            Self::LongString(_) => Amf0Marker::LongString,
        }
    }

    /// Detach the value from the buffer it was decoded from.
    ///
    /// Named after [`Cow::into_owned`], but takes `&self` so nested values can
    /// be converted without moving out of the parent.
    pub fn into_owned(&self) -> Amf0Value<'static> {
        fn owned_properties(props: &[Amf0Property<'_>]) -> Vec<Amf0Property<'static>> {
            props
                .iter()
                .map(|(k, v)| (Cow::Owned(k.to_string()), v.into_owned()))
                .collect()
        }

        match self {
            Self::Number(n) => Amf0Value::Number(*n),
            Self::Boolean(b) => Amf0Value::Boolean(*b),
            Self::String(s) => Amf0Value::String(Cow::Owned(s.to_string())),
            Self::LongString(s) => Amf0Value::LongString(Cow::Owned(s.to_string())),
            Self::Object(props) => Amf0Value::Object(owned_properties(props).into()),
            Self::EcmaArray(props) => Amf0Value::EcmaArray(owned_properties(props).into()),
            Self::StrictArray(values) => {
                Amf0Value::StrictArray(values.iter().map(Amf0Value::into_owned).collect())
            }
            Self::Date {
                timestamp,
                timezone,
            } => Amf0Value::Date {
                timestamp: *timestamp,
                timezone: *timezone,
            },
            Self::Null => Amf0Value::Null,
            Self::Undefined => Amf0Value::Undefined,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `LongString`.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::LongString(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the properties of an `Object` or `EcmaArray`.
    #[inline]
    pub fn as_properties(&self) -> Option<&[Amf0Property<'a>]> {
        match self {
            Self::Object(props) | Self::EcmaArray(props) => Some(props),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Amf0Value<'a>]> {
        match self {
            Self::StrictArray(values) => Some(values),
            _ => None,
        }
    }
}
